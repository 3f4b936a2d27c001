use std::borrow::Cow;

/**
An `AlphanumericTokenizer` splits text into runs of adjacent alphanumeric characters and lowercases them. Runs that are only one character long are skipped.

# Example

| text        | tokens          |
|-------------|-----------------|
| Don't       | ["don"]         |
| $50         | ["50"]          |
| 50(hello)   | ["50", "hello"] |
| 50_hello    | ["50", "hello"] |
| C.E.O.      | []              |
*/
#[derive(Clone, Debug)]
pub struct AlphanumericTokenizer<'a> {
	text: &'a str,
	byte_index: usize,
}

impl<'a> AlphanumericTokenizer<'a> {
	pub fn new(text: &'a str) -> AlphanumericTokenizer<'a> {
		AlphanumericTokenizer {
			text,
			byte_index: 0,
		}
	}
}

impl<'a> Iterator for AlphanumericTokenizer<'a> {
	type Item = Cow<'a, str>;
	fn next(&mut self) -> Option<Self::Item> {
		loop {
			// Find the start of the next alphanumeric run.
			let rest = &self.text[self.byte_index..];
			let offset = rest.find(char::is_alphanumeric)?;
			let start = self.byte_index + offset;
			// Pass over the run, remembering whether it contains any uppercase characters.
			let mut end = start;
			let mut contains_uppercase = false;
			for c in self.text[start..].chars() {
				if !c.is_alphanumeric() {
					break;
				}
				if c.is_uppercase() {
					contains_uppercase = true;
				}
				end += c.len_utf8();
			}
			self.byte_index = end;
			let token = &self.text[start..end];
			// Single character runs are not tokens.
			if token.chars().nth(1).is_none() {
				continue;
			}
			// Lowercase only if the run contained an uppercase character.
			let token = if contains_uppercase {
				Cow::Owned(token.to_lowercase())
			} else {
				Cow::Borrowed(token)
			};
			return Some(token);
		}
	}
}

#[test]
fn test_alphanumeric_tokenizer() {
	fn test(text: &str, tokens: &[&str]) {
		assert!(AlphanumericTokenizer::new(text).eq(tokens.iter().cloned()));
	}
	test("Don't", &["don"]);
	test("CEO/Co-founder", &["ceo", "co", "founder"]);
	test("CEO(Co-founder)", &["ceo", "co", "founder"]);
	test("$50", &["50"]);
	test("50_hello", &["50", "hello"]);
	test("50(hello)", &["50", "hello"]);
	test("C.E.O", &[]);
	test("m/f", &[]);
	test("WIN FREE CASH NOW", &["win", "free", "cash", "now"]);
	test("", &[]);
}
