//! Query normalizer applied before any source is queried.
//!
//! Code-host and reference-docs sources match text literally, so short framework
//! idioms such as `useEffect` recall poorly on their own. Recognized shorthand is
//! expanded into a phrase that names the framework, e.g. `"React useEffect hook"`.

use regex::Regex;
use std::sync::LazyLock;

use super::traits::{Result, SearchError};
use super::types::NormalizedQuery;

pub const DEFAULT_LANGUAGE: &str = "JavaScript";

struct ShorthandRule {
    pattern: Regex,
    framework: &'static str,
    suffix: &'static str,
}

impl ShorthandRule {
    fn new(pattern: &str, framework: &'static str, suffix: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            framework,
            suffix,
        }
    }
}

// Checked in order; the first matching rule wins.
static SHORTHAND_RULES: LazyLock<Vec<ShorthandRule>> = LazyLock::new(|| {
    vec![
        ShorthandRule::new(
            r"(?i)^(use(?:state|effect|context|reducer|callback|memo|ref|layouteffect|insertioneffect|imperativehandle|debugvalue|id|transition|deferredvalue|syncexternalstore|optimistic|actionstate|formstatus))\b",
            "React",
            "hook",
        ),
        // Custom hooks follow the camelCase `useSomething` convention.
        ShorthandRule::new(r"^(use[A-Z][A-Za-z0-9]*)\b", "React", "hook"),
        ShorthandRule::new(
            r"(?i)^(onMounted|onUnmounted|onBeforeMount|onUpdated|watchEffect|defineProps|defineEmits)\b",
            "Vue",
            "composition API",
        ),
        ShorthandRule::new(
            r"(?i)^(ng(?:OnInit|OnDestroy|OnChanges|DoCheck|AfterViewInit|AfterContentInit))\b",
            "Angular",
            "lifecycle hook",
        ),
    ]
});

/// Validate and shape a raw query.
///
/// Pure function: identical input always produces identical output.
///
/// # Examples
///
/// ```ignore
/// let q = normalize("useEffect", None, None)?;
/// assert_eq!(q.text, "React useEffect hook");
/// assert_eq!(q.language, "JavaScript");
/// assert_eq!(q.framework.as_deref(), Some("React"));
/// ```
pub fn normalize(
    query: &str,
    language: Option<&str>,
    framework: Option<&str>,
) -> Result<NormalizedQuery> {
    let original = query.trim();
    if original.is_empty() {
        return Err(SearchError::Validation(
            "Search query is required".to_string(),
        ));
    }

    let framework = framework
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string);

    let (text, rule_framework) = match expand_shorthand(original, framework.as_deref()) {
        Some((text, framework)) => (text, Some(framework.to_string())),
        None => (original.to_string(), None),
    };

    Ok(NormalizedQuery {
        text,
        original: original.to_string(),
        language: normalize_language(language),
        framework: framework.or(rule_framework),
    })
}

fn expand_shorthand(query: &str, framework: Option<&str>) -> Option<(String, &'static str)> {
    let (rule, token) = SHORTHAND_RULES.iter().find_map(|rule| {
        rule.pattern
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|token| (rule, token))
    })?;

    // An explicit framework other than the rule's owns the query.
    if framework.is_some_and(|f| !f.eq_ignore_ascii_case(rule.framework)) {
        return None;
    }

    // Already names its framework; leave it alone.
    let lowered = query.to_lowercase();
    if lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == rule.framework.to_lowercase())
    {
        return None;
    }

    let rest = query[token.end()..].trim();
    let mut expanded = format!("{} {} {}", rule.framework, token.as_str(), rule.suffix);
    if !rest.is_empty() {
        expanded.push(' ');
        expanded.push_str(rest);
    }

    Some((expanded, rule.framework))
}

/// `"React.js"` becomes `"React"`, `"Node"`/`"Node.js"` become `"JavaScript"`,
/// and a missing or blank language falls back to [`DEFAULT_LANGUAGE`].
fn normalize_language(language: Option<&str>) -> String {
    let language = language.map(str::trim).unwrap_or_default().replace(".js", "");

    if language.is_empty() || language.eq_ignore_ascii_case("node") {
        DEFAULT_LANGUAGE.to_string()
    } else {
        language
    }
}
