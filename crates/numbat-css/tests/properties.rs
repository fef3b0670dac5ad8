//! Property tests: arbitrary input never panics and keeps the token
//! stream well formed.

use numbat_css::parser::{
    BlockType, Rule, TokenStream, extract_urls, parse_a_stylesheet, parse_inline_style, parse_media_queries,
    validator_grammar,
};
use numbat_css::selector::{SelectorVisitor, SimpleSelectorSequence, parse, traverse};
use numbat_css::tokenizer::tokenize;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn tokenizer_ends_with_exactly_one_eof(input: String) -> bool {
    let mut errors = Vec::new();
    let tokens = tokenize(&input, 1, 0, &mut errors);
    tokens.last().is_some_and(|t| t.is_eof()) && tokens.iter().filter(|t| t.is_eof()).count() == 1
}

#[quickcheck]
fn tokenizer_positions_never_go_backwards(input: String) -> bool {
    let mut errors = Vec::new();
    let tokens = tokenize(&input, 1, 0, &mut errors);
    tokens
        .windows(2)
        .all(|pair| (pair[0].line(), pair[0].col()) <= (pair[1].line(), pair[1].col()))
}

#[quickcheck]
fn tokenizer_is_deterministic(input: String) -> bool {
    let (mut first_errors, mut second_errors) = (Vec::new(), Vec::new());
    tokenize(&input, 3, 7, &mut first_errors) == tokenize(&input, 3, 7, &mut second_errors)
        && first_errors == second_errors
}

struct Count(usize);

impl SelectorVisitor for Count {
    fn visit_simple_selector_sequence(&mut self, _sequence: &SimpleSelectorSequence) {
        self.0 += 1;
    }
}

#[quickcheck]
fn whole_pipeline_accepts_anything(input: String) -> bool {
    let mut errors = Vec::new();
    let tokens = tokenize(&input, 1, 0, &mut errors);
    let sheet = parse_a_stylesheet(&tokens, &validator_grammar(), BlockType::Ignore, &mut errors);
    let _ = parse_inline_style(&tokens, &mut errors);

    let mut urls = Vec::new();
    extract_urls(&sheet, &mut urls, &mut errors);
    let (mut types, mut features) = (Vec::new(), Vec::new());
    parse_media_queries(&sheet, &mut types, &mut features, &mut errors);

    let mut sequences = Count(0);
    for rule in &sheet.rules {
        if let Rule::Qualified(rule) = rule {
            let mut stream = TokenStream::new(&rule.prelude);
            let _ = stream.consume();
            if let Some(tree) = parse(&mut stream, &mut errors) {
                traverse(tree.root(), &mut sequences);
            }
        }
    }
    sequences.0 <= tokens.len() && errors.iter().all(|e| !e.msg.is_empty())
}
