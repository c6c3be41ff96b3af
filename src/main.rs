use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use trek_core::Config;
use trek_geo::{
    device, DeviceGeolocation, FixedDeviceGeolocation, GeolocationResolver, HttpIpGeolocation,
    ResolverSettings,
};
use trek_services::{QueryForm, TravelApiClient};
use trek_ui::{render, LocationDetectionModel, PostsModel, WeatherModel};

const USAGE: &str = "\
TrekSathi - travel guide for Nepal

Usage:
  treksathi [--config PATH] places [--location NAME] [--lat X --lon Y] [--radius KM]
                                   [--category C] [--min-rating R] [--max-distance KM]
                                   [--device-fix LAT,LON]
  treksathi [--config PATH] weather [--lat X --lon Y] [--device-fix LAT,LON]
  treksathi [--config PATH] post --title T --location L --description D [--image PATH]
  treksathi locations

Categories: restaurant, hotel, attraction, shopping, nature";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Places,
    Weather,
    Post,
    Locations,
    Help,
}

#[derive(Debug)]
struct Cli {
    config: Option<PathBuf>,
    command: Command,
    options: HashMap<String, String>,
}

impl Cli {
    fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.option(name)
            .with_context(|| format!("--{} is required", name))
    }
}

fn allowed_options(command: Command) -> &'static [&'static str] {
    match command {
        Command::Places => &[
            "location",
            "lat",
            "lon",
            "radius",
            "category",
            "min-rating",
            "max-distance",
            "device-fix",
        ],
        Command::Weather => &["lat", "lon", "device-fix"],
        Command::Post => &["title", "location", "description", "image"],
        Command::Locations | Command::Help => &[],
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli> {
    let mut args = args.into_iter();
    let mut config = None;
    let mut command = None;
    let mut options = HashMap::new();

    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            command = Some(Command::Help);
            break;
        }

        if let Some(name) = arg.strip_prefix("--") {
            let value = args
                .next()
                .with_context(|| format!("--{} needs a value", name))?;

            if name == "config" && command.is_none() {
                config = Some(PathBuf::from(value));
                continue;
            }

            let Some(cmd) = command else {
                bail!("--{} given before a command\n\n{}", name, USAGE);
            };
            if !allowed_options(cmd).contains(&name) {
                bail!("Unknown option --{} for this command\n\n{}", name, USAGE);
            }
            options.insert(name.to_string(), value);
            continue;
        }

        if command.is_some() {
            bail!("Unexpected argument '{}'\n\n{}", arg, USAGE);
        }
        command = Some(match arg.as_str() {
            "places" => Command::Places,
            "weather" => Command::Weather,
            "post" => Command::Post,
            "locations" => Command::Locations,
            "help" => Command::Help,
            other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
        });
    }

    Ok(Cli {
        config,
        command: command.unwrap_or(Command::Help),
        options,
    })
}

/// Device source: a fix from the command line wins over one from config.
fn device_source(cli: &Cli, config: &Config) -> Result<Arc<dyn DeviceGeolocation>> {
    match cli.option("device-fix") {
        Some(raw) => {
            let fix = device::parse_fix(raw).map_err(|e| anyhow::anyhow!("--device-fix: {}", e))?;
            Ok(Arc::new(FixedDeviceGeolocation::new(fix)))
        }
        None => Ok(device::from_config(config.geolocation.device_fix)),
    }
}

async fn run_places(cli: &Cli, config: &Config, api: &TravelApiClient) -> Result<()> {
    let ip = HttpIpGeolocation::new(config.geolocation.ip_lookup_url.clone())?;
    let mut resolver = GeolocationResolver::new(
        device_source(cli, config)?,
        Arc::new(ip),
        ResolverSettings::from(&config.geolocation),
    );

    let mut model = LocationDetectionModel::new(QueryForm::from_config(&config.search));

    println!("{}", render::DETECTING_MESSAGE);
    let resolution = model.detect(&mut resolver).await;
    println!(
        "Location: {} ({:?})",
        resolution.coordinate.format(),
        resolution.source
    );
    if let Some(banner) = model.banner() {
        println!("{}", render::banner(banner));
    }

    if let Some(name) = cli.option("location") {
        if !model.form_mut().select_location(name) {
            bail!("Unknown location '{}'. Run `treksathi locations` for the list.", name);
        }
    }

    let edits = [
        ("lat", "latitude"),
        ("lon", "longitude"),
        ("radius", "radiusInKm"),
        ("category", "category"),
        ("min-rating", "minRating"),
        ("max-distance", "maxDistance"),
    ];
    for (flag, field) in edits {
        if let Some(raw) = cli.option(flag) {
            model.form_mut().set_field(field, raw)?;
        }
    }

    for note in model.form().advisories() {
        println!("Note: {}", note);
    }

    let params = model.form().params();
    println!(
        "Searching {} within {} km of {} (min rating {}, max distance {} km)\n",
        params.category.label(),
        params.radius_in_km,
        params.coordinate().format(),
        params.min_rating,
        params.max_distance
    );

    model.submit(api).await;

    match (model.results(), model.banner()) {
        (Some(result), _) => print!("{}", render::results(result)),
        (None, Some(banner)) => println!("{}", render::banner(banner)),
        (None, None) => {}
    }
    Ok(())
}

async fn run_weather(cli: &Cli, config: &Config, api: &TravelApiClient) -> Result<()> {
    let mut model = WeatherModel::new();

    match (cli.option("lat"), cli.option("lon")) {
        (Some(lat), Some(lon)) => {
            model.set_field("latitude", lat)?;
            model.set_field("longitude", lon)?;
            model.submit(api).await;
        }
        (None, None) => {
            let device = device_source(cli, config)?;
            model.locate(device.as_ref(), api).await;
        }
        _ => bail!("--lat and --lon must be given together"),
    }

    println!("Coordinate: {}\n", model.coordinate().format());
    match (model.weather(), model.banner()) {
        (Some(snapshot), _) => print!("{}", render::weather(snapshot)),
        (None, Some(banner)) => println!("{}", render::banner(banner)),
        (None, None) => println!("No coordinate available. Pass --lat and --lon."),
    }
    Ok(())
}

fn run_post(cli: &Cli, config: &Config) -> Result<()> {
    let mut model = PostsModel::new(&config.posts);

    let composer = model.composer_mut();
    composer.set_title(cli.required("title")?);
    composer.set_location(cli.required("location")?);
    composer.set_description(cli.required("description")?);

    if let Some(image) = cli.option("image") {
        if !model.attach_image(&PathBuf::from(image)) {
            if let Some(banner) = model.banner() {
                bail!("{}", banner);
            }
        }
    }

    let counter = model.composer().description_counter();
    if model.submit().is_none() {
        bail!("{}", model.banner().unwrap_or("Post was not created"));
    }

    if let Some(post) = model.posts().first() {
        print!("{}", render::post(post));
        println!("  ({} characters)", counter);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args(std::env::args().skip(1))?;

    match cli.command {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Locations => {
            println!("{}", render::popular_locations());
            return Ok(());
        }
        _ => {}
    }

    let (config, validation) =
        Config::load_validated(cli.config.as_deref()).context("Failed to load configuration")?;

    trek_core::init(&config.logging.level)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    tracing::info!("TrekSathi started, backend {}", config.api.base_url);

    match cli.command {
        Command::Places => {
            let api = TravelApiClient::from_config(&config.api)?;
            run_places(&cli, &config, &api).await
        }
        Command::Weather => {
            let api = TravelApiClient::from_config(&config.api)?;
            run_weather(&cli, &config, &api).await
        }
        Command::Post => run_post(&cli, &config),
        Command::Locations | Command::Help => Ok(()),
    }
}
