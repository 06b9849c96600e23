use bambam_closest_facility::{
    algorithm::centroid::CentroidMode,
    app::workflow,
    config::WorkflowConfiguration,
    model::CfAppError,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CfAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// count the facilities reachable from each road segment
    Run {
        #[arg(long, help = "path to .toml or .json file with workflow parameters")]
        configuration_file: String,
        #[arg(long, help = "overrides the output directory of the configuration file")]
        output_directory: Option<String>,
    },
    /// count routes per segment from an existing route table
    Summarize {
        #[arg(long, help = "route table (.csv or .dbf) with an IncidentID column")]
        routes_file: String,
        #[arg(long, help = "road network table (.shp or .dbf) in incident order")]
        network_file: String,
        #[arg(long, help = "output path for the segment counts csv")]
        output_file: String,
        #[arg(long, default_value = "SEGMENT")]
        segment_field: String,
        #[arg(long, default_value = "Num_Restaurants")]
        count_column: String,
    },
    /// write one point per road segment
    Centroids {
        #[arg(long, help = "road network polyline shapefile")]
        network_file: String,
        #[arg(long, help = "output path for the point shapefile")]
        output_file: String,
        #[arg(long, default_value = "SEGMENT")]
        segment_field: String,
        #[arg(long, value_enum, default_value_t = CentroidMode::Centroid)]
        centroid_mode: CentroidMode,
    },
}

pub fn run(app: &App) -> Result<(), CfAppError> {
    match app {
        App::Run {
            configuration_file,
            output_directory,
        } => {
            log::info!("reading workflow configuration from {configuration_file}");
            let mut conf = WorkflowConfiguration::try_from(configuration_file)?;
            if let Some(dir) = output_directory {
                conf.output_directory = dir.clone();
            }
            let counts_file = workflow::run(&conf)?;
            eprintln!("finished, wrote {}", counts_file.to_string_lossy());
            Ok(())
        }
        App::Summarize {
            routes_file,
            network_file,
            output_file,
            segment_field,
            count_column,
        } => workflow::summarize(
            routes_file,
            network_file,
            output_file,
            segment_field,
            count_column,
        ),
        App::Centroids {
            network_file,
            output_file,
            segment_field,
            centroid_mode,
        } => workflow::centroids(network_file, output_file, segment_field, *centroid_mode),
    }
}

fn main() {
    env_logger::init();
    let args = CfAppArguments::parse();
    log::info!("starting app at {}", chrono::Local::now().to_rfc3339());
    if let Err(e) = run(&args.app) {
        log::error!("bambam_cf failed: {e}");
        std::process::exit(1);
    }
}
