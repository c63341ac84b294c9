use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use storefront::commands::{self, Context};
use storefront::config::{BuildConfig, Service, StorefrontPaths};

/// storefront - command-line client for the storefront services
///
/// Talks to the auth, product and order backends. Each backend's base URL is
/// looked up on every request: first in the runtime env file, then in
/// STOREFRONT_RUNTIME_<KEY> variables, then in the URLs baked in at build time.
///
/// Examples:
///   storefront endpoints          # Show the base URL each service resolves to
///   storefront login --email a@b.c --password pw
///   storefront add 3              # Put product #3 in the cart
///   storefront checkout           # Turn the cart into an order
#[derive(Parser, Debug)]
#[command(author, version = env!("STOREFRONT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Runtime env file (JSON object or `window.__ENV__ = {...};`)
    #[arg(
        long = "env-file",
        env = "STOREFRONT_ENV_FILE",
        value_name = "PATH",
        global = true
    )]
    pub env_file: Option<PathBuf>,

    /// Persistent storage file holding the token and the cart
    #[arg(
        long = "storage",
        env = "STOREFRONT_STORAGE",
        value_name = "PATH",
        global = true
    )]
    pub storage: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the base URL each service currently resolves to
    Endpoints(EndpointsArgs),

    /// Create an account
    Register(CredentialsArgs),

    /// Confirm an email address with the token from the verification link
    Verify(VerifyArgs),

    /// Log in and keep the access token
    Login(CredentialsArgs),

    /// Forget the stored access token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// List published products
    Products,

    /// Show one product
    Product(IdArgs),

    /// Add a product to the cart
    Add(IdArgs),

    /// Show the cart
    Cart,

    /// Empty the cart
    CartClear,

    /// Place an order for everything in the cart
    Checkout,

    /// Show an order
    Order(IdArgs),

    /// Pay for an order
    Pay(IdArgs),

    /// Product administration (requires an admin account)
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(clap::Subcommand, Debug)]
enum AdminCommands {
    /// List every product including drafts
    List,

    /// Create a product
    Create(CreateArgs),

    /// Make a product visible in the shop
    Publish(IdArgs),

    /// Hide a product from the shop
    Unpublish(IdArgs),

    /// Delete a product
    Delete(IdArgs),

    /// Upload a product image (max 5MB)
    UploadImage(UploadArgs),
}

#[derive(clap::Args, Debug)]
pub struct CredentialsArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct EndpointsArgs {
    /// Only this service (auth, product or order)
    pub service: Option<Service>,
}

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    /// Token from the verification email
    #[arg(default_value = "")]
    pub token: String,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    pub name: String,

    pub price: f64,

    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Create the product unpublished
    #[arg(long)]
    pub draft: bool,
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    pub id: i64,

    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = storefront::runtime::RealRuntime;

    let paths = StorefrontPaths::resolve(&runtime, cli.env_file, cli.storage)?;
    let ctx = Context::new(runtime, &paths, BuildConfig::from_build())?;

    match cli.command {
        Commands::Endpoints(args) => commands::endpoints(&ctx, args.service)?,
        Commands::Register(args) => commands::register(&ctx, &args.email, &args.password).await?,
        Commands::Verify(args) => commands::verify(&ctx, &args.token).await?,
        Commands::Login(args) => commands::login(&ctx, &args.email, &args.password).await?,
        Commands::Logout => commands::logout(&ctx)?,
        Commands::Whoami => commands::whoami(&ctx).await?,
        Commands::Products => commands::products(&ctx).await?,
        Commands::Product(args) => commands::product(&ctx, args.id).await?,
        Commands::Add(args) => commands::add_to_cart(&ctx, args.id).await?,
        Commands::Cart => commands::show_cart(&ctx)?,
        Commands::CartClear => commands::clear_cart(&ctx)?,
        Commands::Checkout => commands::checkout(&ctx).await?,
        Commands::Order(args) => commands::order(&ctx, args.id).await?,
        Commands::Pay(args) => commands::pay(&ctx, args.id).await?,
        Commands::Admin(admin) => match admin {
            AdminCommands::List => commands::admin_list(&ctx).await?,
            AdminCommands::Create(args) => {
                commands::admin_create(&ctx, &args.name, &args.description, args.price, args.draft)
                    .await?
            }
            AdminCommands::Publish(args) => {
                commands::admin_set_published(&ctx, args.id, true).await?
            }
            AdminCommands::Unpublish(args) => {
                commands::admin_set_published(&ctx, args.id, false).await?
            }
            AdminCommands::Delete(args) => commands::admin_delete(&ctx, args.id).await?,
            AdminCommands::UploadImage(args) => {
                commands::admin_upload_image(&ctx, &runtime, args.id, &args.file).await?
            }
        },
    }
    Ok(())
}
