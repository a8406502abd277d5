use std::path::PathBuf;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use boh_food_notes::page::{FoodNotesView, SectionBody};
use boh_food_notes::ports::ImageStore;
use boh_food_notes::{
    ApiClient, ClientConfig, CloudinaryStore, FoodNotesPage, NoImageStore, PageView, PendingImage,
    Session,
};
use boh_models::AuthLevel;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Browse and edit the kitchen's dishes")]
struct Cli {
    #[arg(long, env = "BOH_USER_ID", default_value = "")]
    user_id: String,
    #[arg(long, env = "BOH_FIRST_NAME", default_value = "")]
    first_name: String,
    #[arg(long, env = "BOH_AUTH", default_value_t = AuthLevel::User)]
    auth: AuthLevel,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active dishes grouped by menu
    List {
        /// Only show these menus; repeat for several
        #[arg(long = "menu")]
        menus: Vec<String>,
    },
    /// Create a dish
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        advertised_description: String,
        #[arg(long)]
        price: BigDecimal,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "allergen")]
        allergens: Vec<String>,
        #[arg(long = "menu")]
        menus: Vec<String>,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Remove a dish from the active list
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let config = ClientConfig::load()?;

    let cli = Cli::parse();
    let session = Session::new(cli.user_id, cli.first_name, cli.auth);
    let api = ApiClient::new(&config.api_url);
    let images: Arc<dyn ImageStore> = match config.cloudinary.clone() {
        Some(cloudinary) => Arc::new(CloudinaryStore::new(cloudinary)),
        None => Arc::new(NoImageStore),
    };

    let mut page = FoodNotesPage::new(session);
    if !page.session().is_logged_in() {
        return Err("log in first: pass --user-id and --first-name".into());
    }
    page.load(&api, &api).await?;

    match cli.command {
        Commands::List { menus } => {
            if !menus.is_empty() {
                page.set_visible_menus(menus);
            }
        }
        Commands::Create {
            name,
            advertised_description,
            price,
            description,
            allergens,
            menus,
            section,
            image,
        } => {
            let mut editor = page
                .new_dish_editor(config.dirty_tracking, config.close_policy)
                .ok_or("only admin and kitchen staff can create dishes")?;
            editor.open();
            let form = editor.form_mut();
            form.set_name(name);
            form.set_advertised_description(advertised_description);
            form.set_price(price);
            form.set_description(description);
            form.set_allergens(allergens);
            form.set_menus(menus);
            form.set_menu_section(section);
            if let Some(path) = image {
                form.select_image(Some(PendingImage::from_path(path).await?));
            }

            let dish = page.submit(&mut editor, images.as_ref(), &api).await?;
            println!("Created {} ({})\n", dish.name, dish.id);
        }
        Commands::Delete { id } => {
            page.delete_dish(&id, &api).await?;
            println!("Deleted {id}\n");
        }
    }

    match page.view() {
        PageView::Ready(view) => print_view(&view),
        PageView::Loading => println!("Still loading"),
        PageView::LoginRequired => println!("Log in to see Food Notes"),
    }
    Ok(())
}

fn print_view(view: &FoodNotesView) {
    println!("{}", view.title);
    for section in &view.sections {
        println!("\n{}", section.heading);
        match &section.body {
            SectionBody::Empty(text) => println!("  {text}"),
            SectionBody::Dishes(cards) => {
                for card in cards {
                    let icons: Vec<_> = card
                        .allergens
                        .iter()
                        .map(|a| a.icon.map_or(a.name.as_str(), |icon| icon.glyph()))
                        .collect();
                    println!(
                        "  {} ${}  {}  {}",
                        card.dish.name,
                        card.dish.price,
                        card.dish.advertised_description,
                        icons.join(" ")
                    );
                }
            }
        }
    }
}
