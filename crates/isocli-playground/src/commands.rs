use anyhow::{Result, bail};
use isocli::{Cli, arg, command, option, positional, var_arg, variant};

#[derive(Debug, Clone, PartialEq)]
pub enum Commands {
    Hello {
        name: String,
        year: Option<i32>,
        verbose: bool,
    },
    Print {
        verbose: bool,
    },
    Fastlane {
        lane: String,
        options: Vec<String>,
    },
}

/// The playground's command line. Names follow the active template.
pub fn cli() -> Cli<Commands> {
    let hello = command("hello", "greeting")
        .then(
            arg::<String>("name")
                .short("n")
                .description("a name")
                .example("playground".to_string()),
        )
        .and(
            arg::<i32>("year")
                .short("y")
                .description("a year")
                .example(2019)
                .optional(),
        )
        .and(option("verbose").description("be verbose"))
        .map(variant!(Commands::Hello { name, year, verbose }));

    let print = command("print", "list every command form")
        .then(option("verbose").short("v").description("include examples"))
        .map(variant!(Commands::Print { verbose }));

    let fastlane = command("/fastlane", "run lane")
        .then(
            positional::<String>()
                .description("name of the lane")
                .example("test_babylon".to_string()),
        )
        .and(var_arg::<String>(
            "lane options as key:value",
            vec!["branch:develop".to_string()],
        ))
        .map(variant!(Commands::Fastlane { lane, options }));

    Cli::one_of([hello, print, fastlane])
}

pub fn execute(cli: &Cli<Commands>, command: Commands) -> Result<()> {
    tracing::debug!(?command, "executing");
    match &command {
        Commands::Hello {
            name,
            year,
            verbose,
        } => {
            println!("Hello, {name}!");
            if let Some(year) = year {
                println!("{name} was born in {year}.");
            }
            if *verbose && let Some(args) = cli.print(&command) {
                println!("canonical form: {args}");
            }
        }
        Commands::Print { verbose } => {
            for example in cli.examples() {
                if let Some(template) = cli.template_for(example) {
                    println!("{template}");
                }
                if *verbose && let Some(args) = cli.print(example) {
                    println!("  e.g. {args}");
                }
            }
        }
        Commands::Fastlane { lane, options } => {
            println!("Running lane {lane}");
            for option in options {
                let Some((key, value)) = option.split_once(':') else {
                    bail!("lane option '{option}' must look like key:value");
                };
                println!("  {key} = {value}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_cover_every_command() {
        let cli = cli();
        let names: Vec<String> = cli
            .examples()
            .iter()
            .filter_map(|example| cli.print(example))
            .filter_map(|args| args.get(0).map(str::to_string))
            .collect();
        assert_eq!(names, ["hello", "print", "/fastlane"]);
    }

    #[test]
    fn fastlane_rejects_malformed_options() {
        let cli = cli();
        let command = Commands::Fastlane {
            lane: "beta".to_string(),
            options: vec!["device".to_string()],
        };
        let err = execute(&cli, command).unwrap_err();
        assert!(err.to_string().contains("key:value"));
    }
}
