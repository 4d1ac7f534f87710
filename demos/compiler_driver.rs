//! Compiler-driver style option table.
//!
//! Builds a small `cc`-like table in code, parses an argument vector, pulls
//! out the settings a driver would need, reports arguments nobody asked for,
//! and prints the help listing.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p opt-table-demos --example compiler_driver -- -O2 -Iinclude main.c -o main
//! ```
//!
//! Without arguments a built-in sample command line is used.

use opt_table_core::{
    HelpSettings, OptTable, OptTableBuilder, OptionDef, OptionFlags, ParsedArgs,
};

const INPUT: i32 = 1;
const GRP_GENERAL: i32 = 2;
const GRP_PREPROCESSOR: i32 = 3;
const HELP: i32 = 4;
const VERBOSE: i32 = 5;
const VERBOSE_LONG: i32 = 6;
const OUTPUT: i32 = 7;
const OPT_LEVEL: i32 = 8;
const INCLUDE: i32 = 9;
const DEFINE: i32 = 10;
const LINKER: i32 = 11;
const WARNINGS: i32 = 12;
const NO_WARNINGS: i32 = 13;
const ARCH: i32 = 14;
const PASSTHROUGH: i32 = 15;
const DUMP_TABLE: i32 = 16;

fn build_table() -> OptTable {
    OptTableBuilder::new()
        .input(INPUT)
        .add(OptionDef::group(GRP_GENERAL, "general").with_help("General options"))
        .add(OptionDef::group(GRP_PREPROCESSOR, "preprocessor").with_help("Preprocessor options"))
        .add(
            OptionDef::flag(HELP, ["-", "--"], "help")
                .with_help("Display available options")
                .in_group(GRP_GENERAL),
        )
        .add(
            OptionDef::flag(VERBOSE, "-", "v")
                .with_help("Show commands to run")
                .in_group(GRP_GENERAL),
        )
        .add(OptionDef::flag(VERBOSE_LONG, "--", "verbose").alias_of(VERBOSE))
        .add(
            OptionDef::joined_or_separate(OUTPUT, "-", "o")
                .with_meta_var("<file>")
                .with_help("Write output to <file>")
                .with_flags(OptionFlags::RENDER_SEPARATE)
                .in_group(GRP_GENERAL),
        )
        .add(
            OptionDef::joined(OPT_LEVEL, "-", "O")
                .with_meta_var("<level>")
                .with_help("Optimization level"),
        )
        .add(
            OptionDef::joined_or_separate(INCLUDE, "-", "I")
                .with_meta_var("<dir>")
                .with_help("Add directory to the include search path")
                .in_group(GRP_PREPROCESSOR),
        )
        .add(
            OptionDef::joined_or_separate(DEFINE, "-", "D")
                .with_meta_var("<macro>=<value>")
                .with_help("Define <macro> to <value> (or 1 if <value> omitted)")
                .in_group(GRP_PREPROCESSOR),
        )
        .add(
            OptionDef::comma_joined(LINKER, "-", "Wl,")
                .with_meta_var("<arg>")
                .with_help("Pass the comma separated arguments in <arg> to the linker"),
        )
        .add(OptionDef::flag(WARNINGS, "-", "Wall").with_help("Enable most warnings"))
        .add(OptionDef::flag(NO_WARNINGS, "-", "w").with_help("Suppress all warnings"))
        .add(OptionDef::multi_arg(ARCH, "-", "arch-pair", 2))
        .add(
            OptionDef::remaining_args(PASSTHROUGH, "--", "")
                .with_meta_var("<args>...")
                .with_help("Treat every later argument as an input"),
        )
        .add(
            OptionDef::flag(DUMP_TABLE, "-", "dump-table")
                .with_help("Print the option table")
                .with_flags(OptionFlags::HIDDEN),
        )
        .build()
        .unwrap()
}

fn main() {
    let table = build_table();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let argv = if argv.is_empty() {
        [
            "-O2", "-Iinclude", "-I", "vendor", "-DDEBUG", "--verbose", "-Wl,--gc-sections,-s",
            "-Wall", "-w", "main.c", "util.c", "-o", "app", "-fancy", "--", "-weird-name.c",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    } else {
        argv
    };

    println!("argv: {argv:?}\n");

    let ParsedArgs { mut args, missing } = table.parse_args(&argv);
    if let Some(missing) = missing {
        eprintln!("error: {missing}");
        std::process::exit(2);
    }

    if args.has_arg(HELP) {
        print!("{}", table.help(&HelpSettings::default()).unwrap());
        return;
    }

    let verbose = args.has_arg(VERBOSE);
    let output = args.get_last_arg_value(OUTPUT).unwrap_or("a.out").to_string();
    let opt_level = args.get_last_arg_value(OPT_LEVEL).unwrap_or("0").to_string();
    let warnings = args.get_flag_pair(WARNINGS, NO_WARNINGS, false);
    let includes = args.get_all_arg_values(INCLUDE);
    let defines = args.get_all_arg_values(DEFINE);
    let linker = args.get_all_arg_values(LINKER);

    let mut inputs = args.get_all_arg_values(INPUT);
    inputs.extend(args.get_all_arg_values(PASSTHROUGH));

    println!("verbose:   {verbose}");
    println!("output:    {output}");
    println!("opt level: {opt_level}");
    println!("warnings:  {warnings}");
    println!("includes:  {includes:?}");
    println!("defines:   {defines:?}");
    println!("linker:    {linker:?}");
    println!("inputs:    {inputs:?}");

    for arg in args.unclaimed() {
        println!("warning: argument unused during compilation: '{}'", arg.spelling());
    }

    println!("\nnormalized: {}", table.render_args(&args).join(" "));

    println!("\nas JSON:");
    println!("{}", serde_json::to_string_pretty(&args).unwrap());

    println!();
    print!("{}", table.help(&HelpSettings::default()).unwrap());
}
