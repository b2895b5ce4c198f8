//! Property-based tests for the command-line tokenizer

use minishell::LineBuffer;
use proptest::prelude::*;

const WIDE: usize = 4096;

fn tokenize(line: &[u8], max_len: usize) -> (Vec<Vec<u8>>, bool) {
    let mut buffer = LineBuffer::from_bytes(line, max_len);
    let record = buffer.tokenize();
    let args = record.args.iter().map(<[u8]>::to_vec).collect();
    (args, record.background)
}

proptest! {
    #[test]
    fn test_one_argument_per_word(
        words in prop::collection::vec("[!-%'-~]{1,8}", 1..12),
        gaps in prop::collection::vec("[ \t]{1,3}", 12),
        newline in any::<bool>(),
    ) {
        let mut line = String::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                line.push_str(&gaps[i]);
            }
            line.push_str(word);
        }
        if newline {
            line.push('\n');
        }

        let (args, background) = tokenize(line.as_bytes(), WIDE);
        let expected: Vec<Vec<u8>> = words.iter().map(|w| w.as_bytes().to_vec()).collect();
        prop_assert_eq!(args, expected);
        prop_assert!(!background);
    }

    #[test]
    fn test_arguments_never_contain_delimiters(line in "[a-z &\t]{0,60}") {
        let (args, background) = tokenize(line.as_bytes(), WIDE);
        prop_assert_eq!(background, line.contains('&'));
        for arg in &args {
            prop_assert!(!arg.is_empty());
            prop_assert!(!arg.iter().any(|b| matches!(b, b' ' | b'\t' | b'&' | b'\n' | 0)));
        }
    }

    #[test]
    fn test_blank_lines_yield_nothing(line in "[ \t]{0,40}\n?") {
        let (args, background) = tokenize(line.as_bytes(), WIDE);
        prop_assert!(args.is_empty());
        prop_assert!(!background);
    }

    #[test]
    fn test_tokenizing_is_repeatable(line in prop::collection::vec(any::<u8>(), 0..120)) {
        prop_assert_eq!(tokenize(&line, 80), tokenize(&line, 80));
    }

    #[test]
    fn test_argument_count_is_bounded(
        line in prop::collection::vec(any::<u8>(), 0..64),
        max_len in 2usize..64,
    ) {
        let (args, _) = tokenize(&line, max_len);
        prop_assert!(args.len() <= max_len / 2);
    }
}
