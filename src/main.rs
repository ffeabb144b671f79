use std::env;
use std::sync::Arc;

use log::debug;
use recipe_finder::{
    load_categories, load_config, Completion, MealDbClient, Recipe, SearchController,
    ALL_CATEGORIES,
};

const USAGE: &str = "Usage: recipe-finder [--category NAME] [--show N] [QUERY...]\n       recipe-finder --categories";

#[derive(Debug, Default)]
struct CliArgs {
    help: bool,
    list_categories: bool,
    category: Option<String>,
    show: Option<usize>,
    query: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--categories" => parsed.list_categories = true,
            "-c" | "--category" => {
                parsed.category = Some(args.next().ok_or("--category needs a value")?);
            }
            "-s" | "--show" => {
                let value = args.next().ok_or("--show needs a value")?;
                let n: usize = value
                    .parse()
                    .map_err(|_| format!("--show expects a number, got '{}'", value))?;
                if n == 0 {
                    return Err("--show counts from 1".to_string());
                }
                parsed.show = Some(n);
            }
            "-h" | "--help" => parsed.help = true,
            _ => parsed.query.push(arg),
        }
    }

    Ok(parsed)
}

fn print_card(position: usize, recipe: &Recipe) {
    println!("{:>3}. {}", position, recipe.name);
    println!("     {}", recipe.subtitle());
}

fn print_detail(recipe: &Recipe) {
    println!("{}", recipe.name);
    println!("{}", recipe.subtitle());
    println!();
    println!("{}", recipe.instructions);
    if let Some(url) = recipe.source_url() {
        println!();
        println!("View original article: {}", url);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = parse_args(env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = load_config()?;
    debug!("{:?}", config);

    let catalog = Arc::new(MealDbClient::new(&config.catalog)?);

    if args.list_categories {
        for name in load_categories(catalog.as_ref()).await?.as_slice() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut controller = SearchController::new(catalog.clone());
    if let Some(category) = args.category.filter(|c| c != ALL_CATEGORIES) {
        let categories = load_categories(catalog.as_ref()).await?;
        if !categories.contains(&category) {
            return Err(format!("Unknown category '{}'", category).into());
        }
        controller.set_category(category);
    }
    controller.set_query(args.query.join(" "));

    match controller.search().await? {
        Completion::Unchanged => {
            println!("Type a recipe name or pick a category to search.");
            return Ok(());
        }
        Completion::Published { count: 0 } => {
            println!("No recipes found.");
            return Ok(());
        }
        _ => {}
    }

    let found = controller.results().len();
    match args.show {
        Some(n) => match controller.select(n - 1) {
            Some(recipe) => print_detail(recipe),
            None => {
                return Err(format!("Only {} recipes found, cannot show #{}", found, n).into())
            }
        },
        None => {
            for (i, recipe) in controller.results().iter().enumerate() {
                print_card(i + 1, recipe);
            }
        }
    }

    Ok(())
}
