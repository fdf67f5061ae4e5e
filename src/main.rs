use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use unicode_width::UnicodeWidthStr;

use pi_menu::bundle::{self, Bootstrap};
use pi_menu::paths::AppPaths;
use pi_menu::{
    build_menu, create_classifier, hit_test, Canvas, Classifier, ClassifierKind, Configuration,
    Launcher, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "pi-menu")]
#[command(about = "Radial launcher for your favorite applications")]
struct Args {
    /// Path to config.json (defaults to the per-user PiMenu directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to theme.json
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Directory scanned for application bundles on first run
    #[arg(long)]
    apps_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ClassifierArg::Patterns)]
    classifier: ClassifierArg,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClassifierArg {
    Patterns,
    Plain,
}

impl From<ClassifierArg> for ClassifierKind {
    fn from(arg: ClassifierArg) -> Self {
        match arg {
            ClassifierArg::Patterns => ClassifierKind::Patterns,
            ClassifierArg::Plain => ClassifierKind::Plain,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate config.json from the applications directory if it does not exist
    Init,
    /// Show every known application
    List,
    /// Print the favorite buttons and their positions as JSON
    Menu {
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },
    /// Mark an application as favorite (or not, with --off)
    Favorite {
        name: String,
        #[arg(long)]
        off: bool,
    },
    /// Flip the favorite flag of an application
    Toggle { name: String },
    /// Launch an application by name
    Launch { name: String },
    /// Launch whatever favorite sits under a point of the menu canvas
    Click {
        x: f64,
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },
    /// Print the effective theme as JSON
    Theme,
}

struct Session {
    config_path: PathBuf,
    theme_path: PathBuf,
    apps_dir: PathBuf,
    classifier: Box<dyn Classifier>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let session = Session::new(&args)?;
    match args.command {
        Cmd::Init => session.init(),
        Cmd::List => session.list(),
        Cmd::Menu { width, height } => session.menu(width, height),
        Cmd::Favorite { name, off } => session.set_favorite(&name, !off),
        Cmd::Toggle { name } => session.toggle(&name),
        Cmd::Launch { name } => session.launch_by_name(&name),
        Cmd::Click {
            x,
            y,
            width,
            height,
        } => session.click(x, y, width, height),
        Cmd::Theme => session.print_theme(),
    }
}

impl Session {
    fn new(args: &Args) -> Result<Self> {
        let (config_path, theme_path) = match (&args.config, &args.theme) {
            (Some(config), Some(theme)) => (config.clone(), theme.clone()),
            (config, theme) => {
                let paths = AppPaths::new()?;
                (
                    config.clone().unwrap_or(paths.config_file),
                    theme.clone().unwrap_or(paths.theme_file),
                )
            }
        };
        Ok(Self {
            config_path,
            theme_path,
            apps_dir: args
                .apps_dir
                .clone()
                .unwrap_or_else(bundle::default_applications_dir),
            classifier: create_classifier(args.classifier.into()),
        })
    }

    fn bootstrap(&self) -> Result<Bootstrap> {
        bundle::bootstrap(&self.config_path, &self.apps_dir).with_context(|| {
            format!(
                "Unable to generate {} from {}",
                self.config_path.display(),
                self.apps_dir.display()
            )
        })
    }

    /// Loads the configuration, generating it first when it does not exist yet.
    fn configuration(&self) -> Result<Configuration> {
        match Configuration::load(&self.config_path) {
            Ok(config) => Ok(config),
            Err(err) if err.is_missing() => match self.bootstrap()? {
                Bootstrap::Created(config) => Ok(config),
                Bootstrap::Existing => Ok(Configuration::load(&self.config_path)?),
            },
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, config: &Configuration) -> Result<()> {
        config
            .save(&self.config_path)
            .with_context(|| format!("Unable to save {}", self.config_path.display()))
    }

    fn canvas(&self, theme: &Theme, width: Option<f64>, height: Option<f64>) -> Canvas {
        Canvas::new(
            width.unwrap_or(theme.window_width),
            height.unwrap_or(theme.window_height),
        )
    }

    fn init(&self) -> Result<()> {
        match self.bootstrap()? {
            Bootstrap::Created(config) => println!(
                "Generated {} with {} applications ({} favorites)",
                self.config_path.display(),
                config.apps.len(),
                config.favorites().len()
            ),
            Bootstrap::Existing => {
                println!("{} already exists", self.config_path.display())
            }
        }
        Ok(())
    }

    fn list(&self) -> Result<()> {
        let config = self.configuration()?;
        let rows: Vec<_> = config
            .apps
            .iter()
            .map(|app| (app, self.classifier.classify(&app.name)))
            .collect();
        let label_width = rows
            .iter()
            .map(|(_, info)| info.display_name.width())
            .max()
            .unwrap_or(0);

        for (app, info) in rows {
            let mark = if app.favorite { "★" } else { " " };
            let pad = label_width.saturating_sub(info.display_name.width());
            println!(
                "{mark} {icon:<2} {label}{space}  {name}  [{category}]",
                icon = info.icon,
                label = info.display_name,
                space = " ".repeat(pad),
                name = app.name,
                category = info.category,
            );
        }
        Ok(())
    }

    fn menu(&self, width: Option<f64>, height: Option<f64>) -> Result<()> {
        let config = self.configuration()?;
        let theme = Theme::load(&self.theme_path);
        let buttons = build_menu(
            &config,
            self.classifier.as_ref(),
            &theme,
            self.canvas(&theme, width, height),
        );
        if buttons.is_empty() {
            warn!("no favorite applications");
        }
        println!("{}", serde_json::to_string_pretty(&buttons)?);
        Ok(())
    }

    fn set_favorite(&self, name: &str, favorite: bool) -> Result<()> {
        let mut config = self.configuration()?;
        config.set_favorite(name, favorite)?;
        self.save(&config)?;
        info!(app = name, favorite, "favorite updated");
        Ok(())
    }

    fn toggle(&self, name: &str) -> Result<()> {
        let mut config = self.configuration()?;
        let favorite = config.toggle_favorite(name)?;
        self.save(&config)?;
        info!(app = name, favorite, "favorite toggled");
        Ok(())
    }

    fn launch_by_name(&self, name: &str) -> Result<()> {
        let config = self.configuration()?;
        let app = config
            .find(name)
            .with_context(|| format!("No application named {name:?}"))?;
        launch(&app.name, &app.command);
        Ok(())
    }

    fn click(&self, x: f64, y: f64, width: Option<f64>, height: Option<f64>) -> Result<()> {
        let config = self.configuration()?;
        let theme = Theme::load(&self.theme_path);
        let buttons = build_menu(
            &config,
            self.classifier.as_ref(),
            &theme,
            self.canvas(&theme, width, height),
        );
        match hit_test(&buttons, x, y) {
            Some(button) => launch(&button.name, &button.command),
            None => info!(x, y, "click missed every button"),
        }
        Ok(())
    }

    fn print_theme(&self) -> Result<()> {
        let theme = Theme::load(&self.theme_path);
        println!("{}", serde_json::to_string_pretty(&theme)?);
        Ok(())
    }
}

/// A failed launch is reported and otherwise ignored.
fn launch(name: &str, command: &str) {
    info!(app = name, %command, "launching");
    if let Err(err) = Launcher::default().launch(command) {
        error!(app = name, error = %err, "launch failed");
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
