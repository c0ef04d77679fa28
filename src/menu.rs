use crate::inventory::Instance;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Outcome of one line of menu input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index into the catalog.
    Selected(usize),
    Quit,
}

/// Maximum name and id lengths across the catalog. The table pads both
/// columns to exactly these widths.
pub fn column_widths(catalog: &[Instance]) -> (usize, usize) {
    let name_width = catalog.iter().map(|i| i.name.len()).max().unwrap_or(0);
    let id_width = catalog.iter().map(|i| i.id.len()).max().unwrap_or(0);
    (name_width, id_width)
}

/// Renders the numbered instance table in catalog order.
pub fn render_table(catalog: &[Instance]) -> String {
    let (name_width, id_width) = column_widths(catalog);
    let rule = "-".repeat(7 + name_width + id_width);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<3} {:<name_width$}   {:<id_width$}\n",
        "#", "Name", "Instance ID"
    ));
    out.push_str(&rule);
    out.push('\n');

    for (i, instance) in catalog.iter().enumerate() {
        let ordinal = format!("{}.", i + 1);
        out.push_str(&format!(
            "{ordinal:<3} {:<name_width$}   {:<id_width$}\n",
            instance.name, instance.id
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// Classifies one line of input against a catalog of `count` entries.
/// `None` means invalid input that should be re-prompted.
pub fn parse_choice(input: &str, count: usize) -> Option<Choice> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Some(Choice::Quit);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(Choice::Selected(n - 1)),
        _ => None,
    }
}

/// Prints the table and prompts until the user picks an instance or
/// quits. Returns the chosen instance id, or `None` on quit / EOF.
///
/// Only callable with a non-empty catalog.
pub fn present_and_select(catalog: &[Instance]) -> Result<Option<String>> {
    print!("{}", render_table(catalog));

    let stdin = io::stdin();
    loop {
        print!("Choose an instance (1-{}) or q to quit: ", catalog.len());
        io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read menu input")?;
        if bytes == 0 {
            // Ctrl+D
            println!("\nGoodbye!");
            return Ok(None);
        }

        match parse_choice(&line, catalog.len()) {
            Some(Choice::Quit) => {
                println!("Goodbye!");
                return Ok(None);
            }
            Some(Choice::Selected(index)) => return Ok(Some(catalog[index].id.clone())),
            None => println!("Invalid choice, please try again."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<Instance> {
        vec![
            Instance {
                id: "i-aaa".to_string(),
                name: "web-1".to_string(),
            },
            Instance {
                id: "i-0123456789abcdef0".to_string(),
                name: "db".to_string(),
            },
        ]
    }

    #[test]
    fn test_column_widths_match_longest_entries() {
        let (name_width, id_width) = column_widths(&catalog());
        assert_eq!(name_width, 5);
        assert_eq!(id_width, 19);
    }

    #[test]
    fn test_render_table_layout() {
        let rendered = render_table(&catalog());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#   Name    Instance ID        ");
        assert_eq!(lines[1], "-".repeat(7 + 5 + 19));
        assert_eq!(lines[2], "1.  web-1   i-aaa              ");
        assert_eq!(lines[3], "2.  db      i-0123456789abcdef0");
        assert_eq!(lines[4], lines[1]);
    }

    #[test]
    fn test_parse_choice_accepts_full_range() {
        for n in 1..=2 {
            assert_eq!(
                parse_choice(&n.to_string(), 2),
                Some(Choice::Selected(n - 1))
            );
        }
    }

    #[test]
    fn test_parse_choice_rejects_out_of_range_and_garbage() {
        for input in ["0", "3", "-1", "abc", "", "  ", "1.5"] {
            assert_eq!(parse_choice(input, 2), None, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_choice_quit_is_case_insensitive() {
        assert_eq!(parse_choice("q", 2), Some(Choice::Quit));
        assert_eq!(parse_choice("Q", 2), Some(Choice::Quit));
        assert_eq!(parse_choice(" q \n", 2), Some(Choice::Quit));
    }

    #[test]
    fn test_parse_choice_trims_whitespace() {
        assert_eq!(parse_choice(" 2 \n", 2), Some(Choice::Selected(1)));
    }

    #[test]
    fn test_selection_maps_to_instance_id() {
        let catalog = catalog();
        let Some(Choice::Selected(index)) = parse_choice("2", catalog.len()) else {
            panic!("expected a selection");
        };
        assert_eq!(catalog[index].id, "i-0123456789abcdef0");
    }
}
