//! Option table loaded from a YAML definition.
//!
//! Writes a definition file to a temporary directory, loads it back with
//! `TableDefinition::load`, and uses the resulting table to parse arguments
//! and print help with the layout stored in the file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p opt-table-demos --example table_from_yaml
//! ```

use opt_table_config::TableDefinition;
use opt_table_core::HelpSettings;

const DEFINITION: &str = r#"
version: "1.0"
name: archiver
help:
  indent: "    "
  max_line_length: 72
  default_help_group: "Archiver options"
options:
  - { id: 1, kind: input }
  - { id: 2, kind: flag, prefixes: ["-", "/"], name: c, help: "Create a new archive" }
  - { id: 3, kind: flag, prefixes: ["-", "/"], name: x, help: "Extract files from an archive" }
  - { id: 4, kind: joined-or-separate, prefixes: ["-", "/"], name: f, meta_var: "<archive>", help: "Use archive file <archive>" }
  - { id: 5, kind: joined, prefixes: ["--"], name: "exclude=", meta_var: "<pattern>", help: "Skip files matching <pattern>" }
  - { id: 6, kind: flag, prefixes: ["--"], name: create, alias: 2 }
"#;

fn main() {
    let dir = std::env::temp_dir().join("opt_table_demo_yaml");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("archiver.yaml");
    std::fs::write(&path, DEFINITION).unwrap();

    let definition = TableDefinition::load(&path).unwrap();
    let table = definition.build_table().unwrap();
    println!(
        "Loaded '{}' with {} options (unknown fallback id {})\n",
        definition.name.as_deref().unwrap_or("?"),
        table.len(),
        table.unknown_id()
    );

    let argv = ["--create", "/f", "backup.tar", "--exclude=*.tmp", "src", "docs"];
    let mut args = table.parse_args(&argv).into_result().unwrap();

    println!("create:   {}", args.has_arg(2));
    println!("archive:  {:?}", args.get_last_arg_value(4));
    println!("excludes: {:?}", args.get_all_arg_values(5));
    println!("inputs:   {:?}", args.get_all_arg_values(1));
    println!();

    print!("{}", table.help(&HelpSettings::from(&definition.help)).unwrap());

    std::fs::remove_dir_all(&dir).ok();
}
