/*!
This crate computes the features the spam models are trained on. There is a single feature group type, [`BagOfWordsFeatureGroup`](struct.BagOfWordsFeatureGroup.html), which produces TF-IDF features for the text of a message.
*/

mod bag_of_words;

pub use self::bag_of_words::{
	BagOfWordsFeatureGroup, BagOfWordsTokenEntry, FitBagOfWordsFeatureGroupSettings,
};
