/*!
This module contains the stop word list used when building bag of words features from SMS messages.
*/

/// Common English stop words, lowercased and sorted so membership can be tested with a binary search. Contractions are represented by their alphabetic stems, which is what the alphanumeric tokenizer produces for them, e.g. "don't" tokenizes to "don".
pub const STOP_WORDS: &[&str] = &[
	"about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any", "are",
	"aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
	"but", "by", "can", "couldn", "did", "didn", "do", "does", "doesn", "doing", "don", "down",
	"during", "each", "few", "for", "from", "further", "had", "hadn", "has", "hasn", "have",
	"haven", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
	"if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "ma", "me", "mightn",
	"more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not", "now", "of", "off",
	"on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "re",
	"same", "shan", "she", "should", "shouldn", "so", "some", "such", "than", "that", "the",
	"their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
	"through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "we", "were",
	"weren", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
	"won", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

pub fn is_stop_word(token: &str) -> bool {
	STOP_WORDS.binary_search(&token).is_ok()
}

#[test]
fn test_stop_words_are_sorted() {
	for window in STOP_WORDS.windows(2) {
		assert!(window[0] < window[1]);
	}
}

#[test]
fn test_is_stop_word() {
	assert!(is_stop_word("the"));
	assert!(is_stop_word("about"));
	assert!(is_stop_word("yourselves"));
	assert!(!is_stop_word("cash"));
	assert!(!is_stop_word("winner"));
}
