//! Source preprocessing for the ArkTS frontend.

/// Source text with every `struct` declaration keyword replaced by `class `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Rewritten text; byte offsets match the input.
    pub text: String,
    /// Offsets of the replaced keywords, ascending.
    pub struct_offsets: Vec<usize>,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Rewrites `struct Name` to `class  Name` outside strings and comments.
///
/// The keyword only matches as a whole word followed by whitespace and an
/// identifier, so `struct` used as a property or variable name is kept.
#[must_use]
pub fn rewrite_structs(source: &str) -> Rewritten {
    const KEYWORD: &[u8] = b"struct";

    let bytes = source.as_bytes();
    let mut struct_offsets = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |p| i + p);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = source[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |p| i + 2 + p + 2);
            }
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b if is_ident_start(b) => {
                let start = i;
                while i < bytes.len() && is_ident_char(bytes[i]) {
                    i += 1;
                }
                let preceded_by_dot = start > 0 && bytes[start - 1] == b'.';
                if &bytes[start..i] == KEYWORD && !preceded_by_dot {
                    let after_ws = bytes[i..]
                        .iter()
                        .position(|b| !b.is_ascii_whitespace())
                        .map_or(bytes.len(), |p| i + p);
                    if after_ws > i && bytes.get(after_ws).is_some_and(|&b| is_ident_start(b)) {
                        struct_offsets.push(start);
                    }
                }
            }
            _ => i += 1,
        }
    }

    let mut text = source.to_string();
    for &offset in &struct_offsets {
        text.replace_range(offset..offset + KEYWORD.len(), "class ");
    }

    Rewritten {
        text,
        struct_offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_struct_keyword() {
        let r = rewrite_structs("@Component\nstruct Index {}\n");
        assert_eq!(r.text, "@Component\nclass  Index {}\n");
        assert_eq!(r.struct_offsets, vec![11]);
    }

    #[test]
    fn keeps_strings_comments_and_names() {
        let src = "// struct A\n/* struct B */\nconst s = 'struct C';\nlet t = `struct D`;\nobj.struct = 1;\nlet struct = 2;\nstructure X\n";
        let r = rewrite_structs(src);
        assert_eq!(r.text, src);
        assert!(r.struct_offsets.is_empty());
    }

    #[test]
    fn multiple_and_exported() {
        let src = "export struct A {}\nstruct\tB {}\n";
        let r = rewrite_structs(src);
        assert_eq!(r.struct_offsets, vec![7, 19]);
        assert_eq!(r.text.len(), src.len());
        assert_eq!(r.text, "export class  A {}\nclass \tB {}\n");
    }

    #[test]
    fn unterminated_input_does_not_panic() {
        let r = rewrite_structs("'abc\\");
        assert!(r.struct_offsets.is_empty());
        let r = rewrite_structs("/* open");
        assert!(r.struct_offsets.is_empty());
    }
}
