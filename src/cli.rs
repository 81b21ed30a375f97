use std::io::{self, Write};
use rescat::{CatalogError, Reply, ResourceCatalog};

/// Session key used by the terminal front-ends
const LOCAL_SESSION: &str = "local";

pub enum Command {
    Store { link: String, description: String },
    Search { query: String },
    Delete { link: String },
    DeleteAll,
    List { category: String },
    Count,
}

/// Parse a command from a provided argument vector
/// This is used both for command-line args and REPL input
pub fn parse_command_from_args(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command provided. Use: store, search, delete, delete_all, list, count".to_string());
    }

    let command = &args[1];

    match command.as_str() {
        "store" => parse_store(args),
        "search" => parse_search(args),
        "delete" => parse_delete(args),
        "delete_all" => Ok(Command::DeleteAll),
        "list" => parse_list(args),
        "count" => Ok(Command::Count),
        _ => Err(format!("Unknown command: {}. Available: store, search, delete, delete_all, list, count", command)),
    }
}

/// Parse the 'store' command
/// Usage: rescat store <link> <description>
fn parse_store(args: &[String]) -> Result<Command, String> {
    // args[2] = link, args[3..] = description words
    if args.len() < 4 {
        return Err("Usage: store <link> <description>".to_string());
    }

    Ok(Command::Store {
        link: args[2].clone(),
        description: args[3..].join(" "),
    })
}

/// Parse the 'search' command
/// Usage: rescat search <keyword>
fn parse_search(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("Usage: search <keyword>".to_string());
    }

    Ok(Command::Search { query: args[2..].join(" ") })
}

/// Parse the 'delete' command
/// Usage: rescat delete <link>
fn parse_delete(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("Usage: delete <link>".to_string());
    }

    Ok(Command::Delete { link: args[2].clone() })
}

/// Parse the 'list' command
/// Usage: rescat list [category]
fn parse_list(args: &[String]) -> Result<Command, String> {
    if args.len() > 3 {
        eprintln!("Warning: 'list' takes at most one category, ignoring extras");
    }

    Ok(Command::List { category: args.get(2).cloned().unwrap_or_default() })
}

/// REPL mode - interactive session; the session slot lives as long as the loop
pub fn run_repl(catalog: &ResourceCatalog) {
    println!("rescat - Resource Catalog");
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("rescat> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" || input == "start" {
            print_help();
            continue;
        }

        let mut args: Vec<String> = vec!["rescat".to_string()];
        args.extend(input.split_whitespace().map(|s| s.to_string()));

        let command = match parse_command_from_args(&args) {
            Ok(cmd) => cmd,
            Err(error) => {
                eprintln!("Error: {}", error);
                continue;
            }
        };

        render(execute_command(catalog, command));
    }
}

/// Single-command mode - run one command against the configured catalog
/// Usage: rescat <command> [args...]
///
/// Returns whether the command succeeded.
pub fn run_single_command(catalog: &ResourceCatalog, args: &[String]) -> bool {
    let command = match parse_command_from_args(args) {
        Ok(Command::Delete { .. }) => {
            eprintln!("Error: delete needs a search earlier in the same session, run it from the REPL");
            return false;
        }
        Ok(cmd) => cmd,
        Err(error) => {
            eprintln!("Error: {}", error);
            return false;
        }
    };

    let reply = execute_command(catalog, command);
    let ok = reply.ok;
    render(reply);
    ok
}

fn execute_command(catalog: &ResourceCatalog, command: Command) -> Reply {
    match command {
        Command::Store { link, description } => {
            Reply::from_result(catalog.add("", &link, &description))
        }

        Command::Search { query } => {
            Reply::from_result(catalog.search(LOCAL_SESSION, &query))
        }

        Command::Delete { link } => match catalog.delete(LOCAL_SESSION, &link) {
            Err(CatalogError::NotFound(_)) => Reply::failed(format!("Failed to delete {}.", link)),
            result => Reply::from_result(result),
        },

        Command::DeleteAll => Reply::from_result(catalog.delete_all()),

        Command::List { category } => match catalog.list(&category) {
            Ok(resources) if resources.is_empty() => Reply::ok("No resources in this category."),
            Ok(resources) => {
                let mut message = String::new();
                for resource in &resources {
                    message.push_str(&format!("  [{}] {} - {}\n", resource.category, resource.link, resource.description));
                }
                message.push_str(&format!("Total: {} resources", resources.len()));
                Reply::ok(message)
            }
            Err(error) => error.into(),
        },

        Command::Count => match catalog.count() {
            Ok((records, vectors)) => Reply::ok(format!("{} resources, {} indexed vectors", records, vectors)),
            Err(error) => error.into(),
        },
    }
}

fn render(reply: Reply) {
    if reply.ok {
        println!("{}", reply.message);
    } else {
        eprintln!("Error: {}", reply.message);
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  store <link> <description>  - Store a resource");
    println!("  search <keyword>            - Search for resources");
    println!("  delete <link>               - Delete the last searched resource");
    println!("  delete_all                  - Delete all resources");
    println!("  list [category]             - List resources in a category");
    println!("  count                       - Show resource and vector counts");
    println!("  help                        - Show this help");
    println!("  exit, quit                  - Exit the program");
}
