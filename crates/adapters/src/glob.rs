//! Shell-style pattern matcher backed by `globset`.

use globset::{GlobBuilder, GlobMatcher};
use rulesynth_domain::{Pattern, ProjectPath, ProjectPathSet, SEPARATOR, normalize_separators};
use rulesynth_ports::PatternMatcherPort;

/// Permissive matcher for catalog patterns.
///
/// A pattern is needed when any scanned path matches it as a whole, by its
/// final component, or (for directories) by the directory name. Patterns
/// ending in `/` are only checked against directory entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobPatternMatcher;

impl GlobPatternMatcher {
    /// Build a matcher.
    pub const fn new() -> Self {
        Self
    }
}

impl PatternMatcherPort for GlobPatternMatcher {
    fn matches(&self, pattern: &Pattern, paths: &ProjectPathSet) -> bool {
        if pattern.is_blank() {
            return false;
        }
        let key = normalize_separators(pattern.key());

        if pattern.is_directory_only() {
            let whole = CompiledPattern::new(&key);
            let stripped = CompiledPattern::new(key.trim_end_matches(SEPARATOR));
            return paths
                .directories()
                .any(|dir| whole.is_match(dir.as_str()) || matches_directory(&stripped, dir));
        }

        let compiled = CompiledPattern::new(&key);
        paths.iter().any(|path| matches_path(&compiled, path))
    }
}

fn matches_path(compiled: &CompiledPattern, path: &ProjectPath) -> bool {
    if compiled.is_match(path.as_str()) {
        return true;
    }
    let basename = path.basename();
    if !basename.is_empty() && compiled.is_match(basename) {
        return true;
    }
    path.is_dir() && matches_directory(compiled, path)
}

fn matches_directory(compiled: &CompiledPattern, dir: &ProjectPath) -> bool {
    compiled.is_match(dir.trimmed()) || compiled.is_match(dir.name())
}

/// A compiled glob, or a pattern that can never match.
enum CompiledPattern {
    Glob(GlobMatcher),
    Never,
}

impl CompiledPattern {
    fn new(pattern: &str) -> Self {
        let Some(glob) = fnmatch_to_glob(pattern) else {
            return Self::Never;
        };
        match GlobBuilder::new(&glob)
            .literal_separator(false)
            .backslash_escape(true)
            .build()
        {
            Ok(glob) => Self::Glob(glob.compile_matcher()),
            Err(error) => {
                tracing::debug!(pattern, %error, "pattern does not compile, it never matches");
                Self::Never
            },
        }
    }

    fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Glob(matcher) => matcher.is_match(candidate),
            Self::Never => false,
        }
    }
}

/// Rewrite a shell (`fnmatch`) pattern in `globset` syntax.
///
/// Only `*`, `?` and bracket classes are wildcards. Braces and commas are
/// plain text, `[!...]` negates a class while `[^...]` does not, and a `[`
/// with no closing `]` is a literal bracket. Returns `None` when a class
/// holds nothing but reversed ranges, so the pattern can never match.
fn fnmatch_to_glob(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len() + 8);
    let mut rest = chars.as_slice();

    while let Some((&ch, tail)) = rest.split_first() {
        rest = tail;
        match ch {
            '*' => {
                while let Some((&'*', tail)) = rest.split_first() {
                    rest = tail;
                }
                glob.push('*');
            },
            '?' => glob.push('?'),
            '[' => match split_class(rest) {
                Some((body, after)) => {
                    push_class(&mut glob, body)?;
                    rest = after;
                },
                None => push_literal(&mut glob, '['),
            },
            other => push_literal(&mut glob, other),
        }
    }

    Some(glob)
}

/// Split the text after `[` into the class body and what follows its `]`.
///
/// A `]` right after the opening bracket (or after `[!`) is a member.
fn split_class(rest: &[char]) -> Option<(&[char], &[char])> {
    let mut skip = 0;
    if rest.first() == Some(&'!') {
        skip += 1;
    }
    if rest.get(skip) == Some(&']') {
        skip += 1;
    }
    let close = skip + rest.get(skip..)?.iter().position(|&ch| ch == ']')?;
    Some((rest.get(..close)?, rest.get(close + 1..)?))
}

fn push_class(glob: &mut String, body: &[char]) -> Option<()> {
    let (negated, members) = match body.split_first() {
        Some((&'!', members)) => (true, members),
        _ => (false, body),
    };
    let mut class = ClassMembers::parse(members);

    if negated {
        if class.is_empty() {
            glob.push('?');
            return Some(());
        }
        glob.push_str("[!");
        class.push_members(glob);
        glob.push(']');
        return Some(());
    }

    if class.is_empty() {
        return None;
    }
    // `globset` reads a leading `^` or `!` as negation.
    if let Some(safe) = class.ranges.iter().position(|&(start, _)| !is_negation_char(start)) {
        class.ranges.swap(0, safe);
    } else if class.dash {
        class.dash_first = true;
    } else {
        let literals: Vec<char> = class.ranges.iter().map(|&(start, _)| start).collect();
        if let [only] = literals.as_slice() {
            push_literal(glob, *only);
        } else {
            glob.push('{');
            for (index, ch) in literals.into_iter().enumerate() {
                if index > 0 {
                    glob.push(',');
                }
                push_literal(glob, ch);
            }
            glob.push('}');
        }
        return Some(());
    }
    glob.push('[');
    class.push_members(glob);
    glob.push(']');
    Some(())
}

/// Members of one bracket class, reshaped so `globset` reads them the way a
/// shell does.
///
/// A literal `-` is kept apart and emitted first or last. Ranges starting at
/// `^`, `!` or `-` are split so that the start character stands alone.
/// Reversed ranges are dropped.
struct ClassMembers {
    ranges: Vec<(char, char)>,
    dash: bool,
    dash_first: bool,
}

impl ClassMembers {
    fn parse(members: &[char]) -> Self {
        let mut class = Self {
            ranges: Vec::new(),
            dash: false,
            dash_first: false,
        };
        let mut rest = members;
        while let Some((&start, tail)) = rest.split_first() {
            match tail {
                ['-', end, after @ ..] => {
                    class.push_range(start, *end);
                    rest = after;
                },
                _ => {
                    class.push_range(start, start);
                    rest = tail;
                },
            }
        }
        class
    }

    fn push_range(&mut self, start: char, end: char) {
        if start > end {
            return;
        }
        match start {
            '-' => self.dash = true,
            '^' | '!' => self.ranges.push((start, start)),
            _ => {
                self.ranges.push((start, end));
                return;
            },
        }
        if let Some(next) = char::from_u32(u32::from(start) + 1).filter(|_| start < end) {
            self.ranges.push((next, end));
        }
    }

    fn is_empty(&self) -> bool {
        self.ranges.is_empty() && !self.dash
    }

    fn push_members(&self, glob: &mut String) {
        if self.dash && self.dash_first {
            glob.push('-');
        }
        for &(start, end) in &self.ranges {
            glob.push(start);
            if start != end {
                glob.push('-');
                glob.push(end);
            }
        }
        if self.dash && !self.dash_first {
            glob.push('-');
        }
    }
}

const fn is_negation_char(ch: char) -> bool {
    matches!(ch, '^' | '!')
}

fn push_literal(glob: &mut String, ch: char) {
    if matches!(ch, '?' | '*' | '[' | ']' | '{' | '}' | ',' | '\\') {
        glob.push('\\');
    }
    glob.push(ch);
}
