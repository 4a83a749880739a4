//! Text processing for word statistics and the supervised classifier
//!
//! - `tokenizer` - lowercase word tokenizer with stop-word filtering
//! - `vectorizer` - bag-of-words count vectors

mod tokenizer;
mod vectorizer;

pub use tokenizer::{is_stopword, Tokenizer, STOPWORDS};
pub use vectorizer::{BagOfWords, SparseVector};
