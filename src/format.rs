//! Message templates: compile once, format many times.
//!
//! A raw pattern such as `Hello <hover:show_text:{1}>{0}</hover>` is scanned a
//! single time by two independent state machines that advance over the same
//! characters:
//!
//! - the slot scanner finds `{}` / `{n}` argument sites, and
//! - the tag scanner wraps unquoted tag argument values (the text after each
//!   `:` inside `<...>`) in quotes so substituted arguments cannot break out
//!   of the tag.
//!
//! Slot spans are recorded in the coordinates of the *compiled* text, after
//! any quote insertion, so formatting never needs to re-scan.

use std::fmt;

/// Quote inserted around tag values that have none.
const DEFAULT_QUOTE: char = '\'';

/// An argument site within a compiled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Byte offset of the opening `{` in the compiled text
    pub start: usize,

    /// Byte offset one past the closing `}`
    pub end: usize,

    /// Index into the argument list consumed by this slot
    pub target: usize,
}

/// An immutable, compiled message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    slots: Vec<Slot>,
    max_target: Option<usize>,
}

impl Template {
    /// Compile a raw pattern.
    ///
    /// Compilation never fails: anything that is not a well-formed slot is
    /// kept as literal text.
    pub fn compile(pattern: &str) -> Self {
        let mut text = String::with_capacity(pattern.len() + 4);
        let mut slots = Vec::new();
        let mut tags = TagScanner::default();
        let mut braces = SlotScanner::default();

        for c in pattern.chars() {
            text.push_str(tags.step(c));
            if let Some(slot) = braces.step(c, text.len()) {
                slots.push(slot);
            }
            text.push(c);
        }

        let max_target = slots.iter().map(|slot| slot.target).max();
        Self {
            text,
            slots,
            max_target,
        }
    }

    /// The compiled text, with tag values quoted and slots still in place.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Argument sites in ascending order of position.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Highest argument index referenced, or `None` when there are no slots.
    pub fn max_target(&self) -> Option<usize> {
        self.max_target
    }

    /// Substitute `args` into the template.
    ///
    /// Slots whose target index has no matching argument keep their original
    /// `{n}` text, so a template can be partially applied. Extra arguments are
    /// ignored.
    ///
    /// # Arguments
    /// * `args` - Argument values, indexed by slot target
    ///
    /// # Returns
    /// The formatted string. The template itself is left untouched.
    pub fn format<S: AsRef<str>>(&self, args: &[S]) -> String {
        let extra: usize = args.iter().map(|arg| arg.as_ref().len()).sum();
        let mut result = String::with_capacity(self.text.len() + extra);
        let mut cursor = 0;

        for slot in &self.slots {
            let Some(arg) = args.get(slot.target) else {
                continue;
            };
            result.push_str(&self.text[cursor..slot.start]);
            result.push_str(arg.as_ref());
            cursor = slot.end;
        }

        result.push_str(&self.text[cursor..]);
        result
    }
}

impl From<&str> for Template {
    fn from(pattern: &str) -> Self {
        Self::compile(pattern)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ==================== Slot Scanner ====================

#[derive(Debug, Default)]
struct SlotScanner {
    /// Start offset and digits of the `{` currently open
    open: Option<(usize, String)>,

    /// Next index handed out to an empty `{}`
    next_auto: usize,
}

impl SlotScanner {
    /// Observe `c`, which is about to be written at byte offset `at`.
    fn step(&mut self, c: char, at: usize) -> Option<Slot> {
        match c {
            '{' => {
                self.open = Some((at, String::new()));
                None
            }
            '}' => {
                let (start, digits) = self.open.take()?;
                let target = if digits.is_empty() {
                    let target = self.next_auto;
                    self.next_auto += 1;
                    target
                } else {
                    // out of range: stays literal
                    digits.parse().ok()?
                };
                Some(Slot {
                    start,
                    end: at + c.len_utf8(),
                    target,
                })
            }
            // decimal ASCII only
            c if c.is_ascii_digit() => {
                if let Some((_, digits)) = self.open.as_mut() {
                    digits.push(c);
                }
                None
            }
            _ => {
                self.open = None;
                None
            }
        }
    }
}

// ==================== Tag Scanner ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TagState {
    #[default]
    Outside,
    Name,
    Value {
        escape: char,
        /// Nothing seen since the `:` that opened this value
        fresh: bool,
    },
}

#[derive(Debug, Default)]
struct TagScanner {
    state: TagState,
    prev: Option<char>,
}

impl TagScanner {
    /// Observe `c` and return the text to insert before it.
    ///
    /// A value ends at the next `>` or `:` whatever it contains; it is closed
    /// with its escape quote unless the previous character already was one.
    fn step(&mut self, c: char) -> &'static str {
        let (next, insert) = match self.state {
            TagState::Outside if c == '<' => (TagState::Name, ""),
            TagState::Outside => (TagState::Outside, ""),
            TagState::Name => (Self::boundary(c).unwrap_or(TagState::Name), ""),
            TagState::Value { escape, fresh } => match c {
                '>' | ':' => {
                    let insert = if self.prev == Some(escape) {
                        ""
                    } else {
                        quote(escape)
                    };
                    (Self::boundary(c).unwrap_or(TagState::Name), insert)
                }
                '\'' | '"' if fresh => (
                    TagState::Value {
                        escape: c,
                        fresh: false,
                    },
                    "",
                ),
                _ if fresh => (
                    TagState::Value {
                        escape: DEFAULT_QUOTE,
                        fresh: false,
                    },
                    quote(DEFAULT_QUOTE),
                ),
                _ => (self.state, ""),
            },
        };

        self.state = next;
        self.prev = Some(c);
        insert
    }

    /// State entered at a `>` or `:` inside a tag.
    fn boundary(c: char) -> Option<TagState> {
        match c {
            '>' => Some(TagState::Outside),
            ':' => Some(TagState::Value {
                escape: DEFAULT_QUOTE,
                fresh: true,
            }),
            _ => None,
        }
    }
}

fn quote(c: char) -> &'static str {
    if c == '"' {
        "\""
    } else {
        "'"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(template: &Template) -> Vec<usize> {
        template.slots().iter().map(|slot| slot.target).collect()
    }

    // ==================== Slot Recognition Tests ====================

    #[test]
    fn test_indexed_slot() {
        let template = Template::compile("Hello {0}");
        assert_eq!(template.text(), "Hello {0}");
        assert_eq!(
            template.slots(),
            &[Slot {
                start: 6,
                end: 9,
                target: 0
            }]
        );
        assert_eq!(template.max_target(), Some(0));
    }

    #[test]
    fn test_auto_numbered_slots() {
        let template = Template::compile("{} and {}");
        assert_eq!(targets(&template), vec![0, 1]);
    }

    #[test]
    fn test_auto_counter_ignores_explicit_indices() {
        let template = Template::compile("{1} {} {}");
        assert_eq!(targets(&template), vec![1, 0, 1]);
        assert_eq!(template.max_target(), Some(1));
    }

    #[test]
    fn test_no_slots() {
        let template = Template::compile("Plain text");
        assert!(template.slots().is_empty());
        assert_eq!(template.max_target(), None);
    }

    #[test]
    fn test_non_digit_aborts_slot() {
        let template = Template::compile("{name} {0x}");
        assert!(template.slots().is_empty());
        assert_eq!(template.text(), "{name} {0x}");
    }

    #[test]
    fn test_non_ascii_digits_are_literal() {
        let template = Template::compile("{\u{0663}} {\u{FF11}}");
        assert!(template.slots().is_empty());
        assert_eq!(template.format(&["x"]), "{\u{0663}} {\u{FF11}}");
    }

    #[test]
    fn test_unterminated_brace_is_literal() {
        let template = Template::compile("Open {0");
        assert!(template.slots().is_empty());
        assert_eq!(template.format(&["x"]), "Open {0");
    }

    #[test]
    fn test_reopened_brace_restarts() {
        let template = Template::compile("{1{0}");
        assert_eq!(
            template.slots(),
            &[Slot {
                start: 2,
                end: 5,
                target: 0
            }]
        );
    }

    #[test]
    fn test_stray_closing_brace_is_literal() {
        let template = Template::compile("a } b");
        assert!(template.slots().is_empty());
    }

    #[test]
    fn test_out_of_range_index_is_literal() {
        let pattern = "{99999999999999999999999999}";
        let template = Template::compile(pattern);
        assert!(template.slots().is_empty());
        assert_eq!(template.format(&["x"]), pattern);
    }

    // ==================== Tag Quoting Tests ====================

    #[test]
    fn test_unquoted_tag_value_is_quoted() {
        let template = Template::compile("<tag:value>");
        assert_eq!(template.text(), "<tag:'value'>");
    }

    #[test]
    fn test_quoted_tag_value_is_unchanged() {
        assert_eq!(Template::compile("<tag:'value'>").text(), "<tag:'value'>");
        assert_eq!(Template::compile("<tag:\"value\">").text(), "<tag:\"value\">");
    }

    #[test]
    fn test_double_quoted_value_keeps_single_quotes() {
        let template = Template::compile("<tag:\"it's\">");
        assert_eq!(template.text(), "<tag:\"it's\">");
    }

    #[test]
    fn test_each_tag_argument_is_quoted() {
        let template = Template::compile("<lang:test2:{2}>");
        assert_eq!(template.text(), "<lang:'test2':'{2}'>");
        let slot = template.slots()[0];
        assert_eq!(&template.text()[slot.start..slot.end], "{2}");
    }

    #[test]
    fn test_colon_closes_quoted_value() {
        let template = Template::compile("<hover:show_text:'a: b'>");
        assert_eq!(template.text(), "<hover:'show_text':'a':' b'>");
    }

    #[test]
    fn test_empty_value_gets_closing_quote_only() {
        assert_eq!(Template::compile("<tag:>").text(), "<tag:'>");
        assert_eq!(Template::compile("<a::b>").text(), "<a:':'b'>");
    }

    #[test]
    fn test_unclosed_quoted_value_ends_at_bracket() {
        let template = Template::compile("<tag:'a> and <b:c>");
        assert_eq!(template.text(), "<tag:'a'> and <b:'c'>");
    }

    #[test]
    fn test_text_after_closing_quote_is_closed_again() {
        assert_eq!(Template::compile("<tag:'a'b>").text(), "<tag:'a'b'>");
    }

    #[test]
    fn test_apostrophe_in_quoted_value_keeps_later_tags_quoted() {
        let template =
            Template::compile("<hover:show_text:'It's fine'>x</hover> <click:run_command:{0}>go");
        assert_eq!(
            template.text(),
            "<hover:'show_text':'It's fine'>x</hover> <click:'run_command':'{0}'>go"
        );
        assert_eq!(
            template.format(&["/op"]),
            "<hover:'show_text':'It's fine'>x</hover> <click:'run_command':'/op'>go"
        );
    }

    #[test]
    fn test_tag_without_value_is_unchanged() {
        let template = Template::compile("<green>Hi</green>");
        assert_eq!(template.text(), "<green>Hi</green>");
    }

    #[test]
    fn test_nested_open_bracket_is_literal() {
        let template = Template::compile("<a<b:c>");
        assert_eq!(template.text(), "<a<b:'c'>");
    }

    #[test]
    fn test_colon_outside_tag_is_literal() {
        let template = Template::compile("Time: {0}");
        assert_eq!(template.text(), "Time: {0}");
    }

    #[test]
    fn test_slots_shift_after_inserted_quotes() {
        let template = Template::compile("<click:{0}> {1}");
        assert_eq!(template.text(), "<click:'{0}'> {1}");
        for slot in template.slots() {
            let span = &template.text()[slot.start..slot.end];
            assert_eq!(span, format!("{{{}}}", slot.target));
        }
    }

    // ==================== Formatting Tests ====================

    #[test]
    fn test_format_single_argument() {
        let template = Template::compile("Hello {0}");
        assert_eq!(template.format(&["World"]), "Hello World");
    }

    #[test]
    fn test_format_ignores_extra_arguments() {
        let template = Template::compile("Hello {0}");
        assert_eq!(template.format(&["World", "unused"]), "Hello World");
    }

    #[test]
    fn test_format_missing_argument_keeps_slot_text() {
        let template = Template::compile("<tag:{2}> and {0}");
        assert_eq!(template.format(&["x"]), "<tag:'{2}'> and x");
    }

    #[test]
    fn test_format_reordered_and_repeated() {
        let template = Template::compile("{1}-{0}-{1}");
        assert_eq!(template.format(&["a", "bb"]), "bb-a-bb");
    }

    #[test]
    fn test_format_with_growing_and_shrinking_values() {
        let template = Template::compile("[{0}][{1}][{2}]");
        let formatted = template.format(&["", "a much longer value", "z"]);
        assert_eq!(formatted, "[][a much longer value][z]");
    }

    #[test]
    fn test_format_is_repeatable() {
        let template = Template::compile("{0}!");
        assert_eq!(template.format(&["a"]), "a!");
        assert_eq!(template.format(&["b"]), "b!");
        assert_eq!(template.text(), "{0}!");
    }

    #[test]
    fn test_format_multibyte_text() {
        let template = Template::compile("héllo {0} — ünïcode {1}");
        assert_eq!(template.format(&["wörld", "✓"]), "héllo wörld — ünïcode ✓");
    }

    #[test]
    fn test_format_nested_tag_arguments() {
        let template = Template::compile("<green>Test {1} <lang:test2:{2}> {0}");
        assert_eq!(
            template.format(&["1", "2", "3"]),
            "<green>Test 2 <lang:'test2':'3'> 1"
        );
    }

    #[test]
    fn test_format_owned_arguments() {
        let template = Template::compile("{0} {1}");
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(template.format(args.as_slice()), "a b");
    }

    #[test]
    fn test_display_shows_compiled_text() {
        let template = Template::from("<tag:v>");
        assert_eq!(template.to_string(), "<tag:'v'>");
    }
}
