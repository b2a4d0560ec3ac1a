use anyhow::Result;
use std::ffi::OsString;
use weltgeist_core::{CategoryId, HierarchyLevel, Intent, LayoutMode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerArgs {
    pub mode: Option<LayoutMode>,
    pub search: Option<String>,
    pub hide_levels: Vec<HierarchyLevel>,
    pub hide_categories: Vec<CategoryId>,
    pub range: Option<(String, String)>,
    pub json: bool,
}

impl ViewerArgs {
    /// The intents a user would have sent to reach this view.
    pub fn intents(&self) -> Vec<Intent> {
        let mut out = Vec::new();
        if let Some(mode) = self.mode {
            out.push(Intent::SetLayoutMode { mode });
        }
        if let Some((start, end)) = &self.range {
            out.push(Intent::SetTimeRange {
                start: start.clone(),
                end: end.clone(),
            });
        }
        for level in &self.hide_levels {
            out.push(Intent::ToggleLevel { level: *level });
        }
        for id in &self.hide_categories {
            out.push(Intent::ToggleCategory { id: id.clone() });
        }
        if let Some(query) = &self.search {
            out.push(Intent::SearchSubmitted {
                query: query.clone(),
            });
        }
        out
    }
}

pub fn parse_args() -> Result<ViewerArgs> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ViewerArgs>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = ViewerArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--mode" {
            let Some(value) = args.next() else {
                anyhow::bail!("--mode expects chronological|lanes");
            };
            let value = value.to_string_lossy();
            let Some(mode) = LayoutMode::parse(&value) else {
                anyhow::bail!("invalid mode: {value} (expected chronological|lanes)");
            };
            out.mode = Some(mode);
        } else if arg == "--search" {
            let Some(query) = args.next() else {
                anyhow::bail!("--search expects a query");
            };
            out.search = Some(query.to_string_lossy().into_owned());
        } else if arg == "--hide-level" {
            let Some(value) = args.next() else {
                anyhow::bail!("--hide-level expects a level");
            };
            let value = value.to_string_lossy();
            let Some(level) = HierarchyLevel::parse(&value) else {
                anyhow::bail!(
                    "invalid level: {value} (expected weltgeist|zeitgeist|geist|biology|dna)"
                );
            };
            if !out.hide_levels.contains(&level) {
                out.hide_levels.push(level);
            }
        } else if arg == "--hide-category" {
            let Some(id) = args.next() else {
                anyhow::bail!("--hide-category expects a category id");
            };
            let id = CategoryId(id.to_string_lossy().into_owned());
            if !out.hide_categories.contains(&id) {
                out.hide_categories.push(id);
            }
        } else if arg == "--range" {
            let (Some(start), Some(end)) = (args.next(), args.next()) else {
                anyhow::bail!("--range expects <start> <end>");
            };
            out.range = Some((
                start.to_string_lossy().into_owned(),
                end.to_string_lossy().into_owned(),
            ));
        } else if arg == "--json" {
            out.json = true;
        } else {
            anyhow::bail!("unknown argument: {:?}", arg);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn parses_full_command_line() {
        let parsed = parse_args_from(args(&[
            "--mode",
            "lanes",
            "--hide-level",
            "dna",
            "--hide-category",
            "science",
            "--range",
            "1700",
            "1900",
            "--search",
            "revolution",
            "--json",
        ]))
        .expect("args parsed");

        assert_eq!(parsed.mode, Some(LayoutMode::Lanes));
        assert_eq!(parsed.hide_levels, vec![HierarchyLevel::Dna]);
        assert_eq!(parsed.hide_categories, vec![CategoryId::from("science")]);
        assert_eq!(parsed.range, Some(("1700".to_string(), "1900".to_string())));
        assert_eq!(parsed.search.as_deref(), Some("revolution"));
        assert!(parsed.json);
    }

    #[test]
    fn repeated_hides_toggle_once() {
        let parsed = parse_args_from(args(&["--hide-level", "geist", "--hide-level", "geist"]))
            .expect("args parsed");
        assert_eq!(parsed.intents().len(), 1);
    }

    #[test]
    fn rejects_unknown_and_incomplete_arguments() {
        assert!(parse_args_from(args(&["--verbose"])).is_err());
        assert!(parse_args_from(args(&["--mode", "radial"])).is_err());
        assert!(parse_args_from(args(&["--range", "1700"])).is_err());
        assert!(parse_args_from(args(&["--hide-level", "soul"])).is_err());
    }

    #[test]
    fn no_arguments_means_no_intents() {
        let parsed = parse_args_from(Vec::<OsString>::new()).expect("args parsed");
        assert_eq!(parsed, ViewerArgs::default());
        assert!(parsed.intents().is_empty());
    }
}
