//! Path string commands: sanitize, truncate and legalize.

use anyhow::Context;
use rayon::prelude::*;
use tracing::warn;

use super::PathOptions;
use crate::config::Config;
use crate::legalize::{Replacement, sanitize_path};

/// Replace illegal characters in each path
pub fn cmd_sanitize(config: &Config, paths: &[String], options: &PathOptions) -> anyhow::Result<()> {
    let settings = options.apply(&config.paths);
    let rules = settings
        .replacements()
        .context("Invalid replacement rule in config")?;
    let platform = settings.platform();

    for path in paths {
        println!("{}", sanitize_path(path, platform, &rules));
    }
    Ok(())
}

/// Cut every segment of each path to the filename limit
pub fn cmd_truncate(config: &Config, paths: &[String], options: &PathOptions) -> anyhow::Result<()> {
    let legalizer = options.apply(&config.paths).legalizer();

    for path in paths {
        println!("{}", legalizer.truncate(path));
    }
    Ok(())
}

/// Sanitize with the configured rules, retrying with the alternates and
/// finally falling back to the defaults plus truncation
pub fn cmd_legalize(
    config: &Config,
    paths: &[String],
    options: &PathOptions,
    replace: &[String],
    alternate: &[String],
) -> anyhow::Result<()> {
    let settings = options.apply(&config.paths);

    let mut primary = settings
        .replacements()
        .context("Invalid replacement rule in config")?;
    primary.extend(parse_rules(replace)?);

    let mut secondary = settings
        .alternate_replacements()
        .context("Invalid alternate rule in config")?;
    secondary.extend(parse_rules(alternate)?);

    let candidates = rule_candidates(primary, secondary);
    let legalizer = settings.legalizer();

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| {
            (
                path,
                legalizer.legalize_path(path, &candidates, Replacement::defaults()),
            )
        })
        .collect();

    for (input, legalized) in results {
        if legalized.truncated {
            warn!("{:?} needed truncation to fit", input);
        }
        println!("{}", legalized.path);
    }
    Ok(())
}

fn parse_rules(pairs: &[String]) -> anyhow::Result<Vec<Replacement>> {
    pairs
        .iter()
        .map(|pair| {
            Replacement::parse_pair(pair).with_context(|| format!("Invalid rule {:?}", pair))
        })
        .collect()
}

/// Rule sets to try in order. No rules at all means built-ins only.
fn rule_candidates(primary: Vec<Replacement>, alternate: Vec<Replacement>) -> Vec<Vec<Replacement>> {
    match (primary.is_empty(), alternate.is_empty()) {
        (true, true) => Vec::new(),
        (_, true) => vec![primary],
        _ => vec![primary, alternate],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules() {
        let rules = parse_rules(&["^The =".to_string(), "a=b".to_string()]).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].pattern(), "^The ");
        assert_eq!(rules[0].with(), "");
    }

    #[test]
    fn test_parse_rules_rejects_bad_pattern() {
        assert!(parse_rules(&["(=x".to_string()]).is_err());
    }

    #[test]
    fn test_rule_candidates() {
        let rule = || Replacement::new("a", "b").unwrap();
        assert!(rule_candidates(vec![], vec![]).is_empty());
        assert_eq!(rule_candidates(vec![rule()], vec![]).len(), 1);
        assert_eq!(rule_candidates(vec![rule()], vec![rule()]).len(), 2);
        // Alternates alone still run after an empty primary set
        let only_alternate = rule_candidates(vec![], vec![rule()]);
        assert_eq!(only_alternate.len(), 2);
        assert!(only_alternate[0].is_empty());
    }

    #[test]
    fn test_commands_run_with_defaults() {
        let config = Config::default();
        let options = PathOptions {
            max_length: Some(20),
            ..Default::default()
        };
        let paths = vec!["a/b:c".to_string()];
        assert!(cmd_sanitize(&config, &paths, &options).is_ok());
        assert!(cmd_truncate(&config, &paths, &options).is_ok());
        assert!(cmd_legalize(&config, &paths, &options, &[], &[]).is_ok());
    }

    #[test]
    fn test_legalize_reports_bad_cli_rule() {
        let config = Config::default();
        let paths = vec!["a".to_string()];
        let result = cmd_legalize(
            &config,
            &paths,
            &PathOptions::default(),
            &["[=x".to_string()],
            &[],
        );
        assert!(result.is_err());
    }
}
