//! Printf-style template compilation.
//!
//! The template language is deliberately tiny: `%` introduces an escape,
//! `%%` is a literal percent sign, and `%` followed by any other single code
//! point X forms a field whose implicit key is the two-code-point string
//! `%X`. Everything else is literal text. A template ending in a lone `%`
//! does not compile.
//!
//! The scan walks code points, never raw bytes, so a multi-byte character
//! directly after `%` becomes part of the key instead of being split.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::format::{LineFormat, LineFormatBuilder};
use crate::segment::Padding;

/// Per-field padding policies consulted while compiling a template.
///
/// Keys use the template's implicit `%X` form. Unregistered keys default to
/// [`Padding::None`].
#[derive(Clone, Debug, Default)]
pub struct PaddingSpec {
    fields: HashMap<String, Padding>,
}

impl PaddingSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the padding policy for a field key.
    pub fn pad(mut self, key: impl Into<String>, padding: Padding) -> Self {
        self.fields.insert(key.into(), padding);
        self
    }

    /// The policy for `key`, defaulting to [`Padding::None`].
    pub fn get(&self, key: &str) -> Padding {
        self.fields.get(key).copied().unwrap_or_default()
    }
}

impl LineFormat {
    /// Compiles a printf-style template with no padding policies.
    ///
    /// ```rust
    /// use rowfmt::{LineFormat, MapSource};
    ///
    /// let format = LineFormat::compile("abc %s_def")?;
    /// let values = MapSource::from_iter([("%s", "test")]);
    /// assert_eq!(format.render(&values)?, "abc test_def");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn compile(template: &str) -> Result<LineFormat, CompileError> {
        Self::compile_with(template, &PaddingSpec::default())
    }

    /// Compiles a template, assigning each derived `%X` key the padding
    /// registered for it in `paddings`.
    pub fn compile_with(
        template: &str,
        paddings: &PaddingSpec,
    ) -> Result<LineFormat, CompileError> {
        let mut builder = LineFormatBuilder::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }
            match chars.next() {
                None => return Err(CompileError::DanglingEscape),
                Some('%') => literal.push('%'),
                Some(marker) => {
                    builder = builder.literal(std::mem::take(&mut literal));
                    let key = format!("%{marker}");
                    let padding = paddings.get(&key);
                    builder = builder.field_padded(key, padding);
                }
            }
        }

        Ok(builder.literal(literal).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::value::MapSource;

    fn none(key: &str) -> Result<String, ResolveError> {
        Err(ResolveError::NotFound(key.to_string()))
    }

    #[test]
    fn test_compile_basic() {
        let format = LineFormat::compile("abc %s_def").unwrap();
        let values = MapSource::from_iter([("%s", "test")]);
        assert_eq!(format.render(&values).unwrap(), "abc test_def");
    }

    #[test]
    fn test_compile_escapes() {
        let format = LineFormat::compile("abc%% %%%% %%s").unwrap();
        assert!(format.field_keys().is_empty());
        assert_eq!(format.render(&none).unwrap(), "abc% %% %s");
    }

    #[test]
    fn test_compile_empty() {
        let format = LineFormat::compile("").unwrap();
        assert_eq!(format.render(&none).unwrap(), "");
    }

    #[test]
    fn test_compile_literal_only() {
        let format = LineFormat::compile("abcde").unwrap();
        assert_eq!(format.render(&none).unwrap(), "abcde");
    }

    #[test]
    fn test_compile_astral_plane_key() {
        // U+20BB7 is outside the BMP; it must survive as one code point.
        let format = LineFormat::compile("𠮷%𠮷").unwrap();
        assert_eq!(format.field_keys(), ["%𠮷"]);
        let values = MapSource::from_iter([("%𠮷", "あ")]);
        assert_eq!(format.render(&values).unwrap(), "𠮷あ");
    }

    #[test]
    fn test_compile_dangling_escape() {
        assert_eq!(
            LineFormat::compile("abc %s_def%"),
            Err(CompileError::DanglingEscape)
        );
        assert_eq!(LineFormat::compile("%"), Err(CompileError::DanglingEscape));
    }

    #[test]
    fn test_compile_matches_builder() {
        let compiled = LineFormat::compile("a %s b").unwrap();
        let built = LineFormat::builder()
            .literal("a ")
            .field("%s")
            .literal(" b")
            .build();
        assert_eq!(compiled, built);
    }

    #[test]
    fn test_compile_with_padding() {
        let paddings = PaddingSpec::new()
            .pad("%a", Padding::Left)
            .pad("%b", Padding::Right);
        let compiled = LineFormat::compile_with("%a %b %c", &paddings).unwrap();

        let built = LineFormat::builder()
            .field_padded("%a", Padding::Left)
            .literal(" ")
            .field_padded("%b", Padding::Right)
            .literal(" ")
            .field("%c")
            .build();
        assert_eq!(compiled, built);
    }

    #[test]
    fn test_padding_spec_defaults_to_none() {
        let paddings = PaddingSpec::new().pad("%a", Padding::Left);
        assert_eq!(paddings.get("%a"), Padding::Left);
        assert_eq!(paddings.get("%z"), Padding::None);
    }

    #[test]
    fn test_repeated_key_kept_in_order() {
        let format = LineFormat::compile("%a%b%a").unwrap();
        assert_eq!(format.field_keys(), ["%a", "%b", "%a"]);
    }
}
