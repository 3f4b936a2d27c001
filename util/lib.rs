/*!
This crate contains the utilities shared by the rest of the sift workspace: the tokenizer and stop word list used to turn messages into tokens, the atomic progress counter used to report training progress across threads, and the hyper serve helper.
*/

pub mod alphanumeric_tokenizer;
pub mod progress_counter;
pub mod serve;
pub mod text;
