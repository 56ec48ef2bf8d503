use proptest::prelude::*;
use svn2git::core::{escape_quotes, parse_branch_list, parse_branch_name, split_arguments};

fn branch_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/-]{1,24}"
}

proptest! {
    #[test]
    fn prop_parse_strips_marker_and_whitespace(
        name in branch_name(),
        lead in " {0,3}",
        trail in " {0,3}",
        marked in any::<bool>(),
    ) {
        let marker = if marked { "* " } else { "" };
        let line = format!("{lead}{marker}{name}{trail}");
        prop_assert_eq!(parse_branch_name(&line), name.as_str());
    }

    #[test]
    fn prop_parse_list_keeps_order(names in prop::collection::vec(branch_name(), 0..8)) {
        let output: String = names
            .iter()
            .enumerate()
            .map(|(i, n)| if i == 0 { format!("* {n}\n") } else { format!("  {n}\n") })
            .collect();
        prop_assert_eq!(parse_branch_list(&output), names);
    }

    #[test]
    fn prop_escaped_value_survives_quoting(value in "[ -\\[\\]-~]{0,32}") {
        let line = format!("tag -a -m \"{}\"", escape_quotes(&value));
        let args = split_arguments(&line);
        prop_assert_eq!(args.len(), 3);
        // Double quotes come back literal, single quotes keep their backslash
        let expected = escape_quotes(&value).replace("\\\"", "\"");
        prop_assert_eq!(&args[2], &expected);
    }
}

#[test]
fn test_only_one_marker_is_removed() {
    assert_eq!(parse_branch_name("*master"), "master");
    assert_eq!(parse_branch_name("  dev  "), "dev");
    assert_eq!(parse_branch_name("**x"), "*x");
}
