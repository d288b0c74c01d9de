use crate::discover::discover_policy_files;
use crate::error::SourceError;
use camino::{Utf8Path, Utf8PathBuf};
use pkgaudit_domain::model::PolicyDocument;
use serde_yaml::Value;

/// Parse one policy document.
///
/// An empty document, or one whose top level is not a mapping, reads as a policy with no
/// audits. Only YAML syntax errors and a mistyped `pkg` key structure fail.
pub fn parse_policy_yaml(text: &str) -> Result<PolicyDocument, SourceError> {
    parse_value(text).map_err(SourceError::PolicyText)
}

fn parse_value(text: &str) -> Result<PolicyDocument, serde_yaml::Error> {
    if is_blank(text) {
        return Ok(PolicyDocument::default());
    }
    let value: Value = serde_yaml::from_str(text)?;
    match value {
        Value::Mapping(_) => serde_yaml::from_value(value),
        Value::Null => Ok(PolicyDocument::default()),
        _ => {
            tracing::warn!("ignoring policy document that is not a mapping");
            Ok(PolicyDocument::default())
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

pub fn load_policy_file(path: &Utf8Path) -> Result<PolicyDocument, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_value(&text).map_err(|source| SourceError::Policy {
        path: path.to_owned(),
        source,
    })
}

/// Discover and parse every policy under `roots`, keeping the order the roots were given in.
pub fn load_policies(roots: &[Utf8PathBuf]) -> Result<Vec<PolicyDocument>, SourceError> {
    let mut documents = Vec::new();
    for root in roots {
        for file in discover_policy_files(root)? {
            tracing::debug!(path = %file, "loading policy");
            documents.push(load_policy_file(&file)?);
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_and_scalar_documents_have_no_audits() {
        for text in ["", "# only a comment\n", "just a string", "- a\n- b\n"] {
            let doc = parse_policy_yaml(text).expect("parse");
            assert_eq!(doc, PolicyDocument::default(), "{text:?}");
        }
    }

    #[test]
    fn reads_pkg_section() {
        let doc = parse_policy_yaml(
            r#"
pkg:
  blacklist:
    telnet:
      data:
        '*':
          - telnet: telnet-bad
      description: Telnet is evil
"#,
        )
        .expect("parse");
        let pkg = doc.pkg.expect("pkg");
        let blacklist = pkg.blacklist.expect("blacklist");
        assert_eq!(blacklist.keys().collect::<Vec<_>>(), vec!["telnet"]);
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = parse_policy_yaml("pkg: [unclosed\n").expect_err("bad yaml");
        assert!(matches!(err, SourceError::PolicyText(_)));
    }

    proptest! {
        #[test]
        fn parser_never_panics(input in ".*") {
            let _ = crate::fuzz::parse_policy_yaml(&input);
        }
    }
}
