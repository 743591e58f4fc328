use std::{error::Error, net::SocketAddr, sync::Arc, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use roadmap_weaver::{
	config::DEFAULT_MODEL, openai::OpenAiLlm, service, text, Config, LlmConfig, Loom,
	RoadmapRequest,
};
use tracing::{info, Level};
use tracing_subscriber::fmt;

#[derive(Parser, Debug)]
#[command(version, about = "Generates learning roadmaps with an LLM")]
struct Args {
	/// Model used unless a request names another one.
	#[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
	model: String,
	/// Base URL of an OpenAI compatible API.
	#[arg(long, env = "OPENAI_BASE_URL", global = true)]
	api_base: Option<String>,
	#[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, hide = true, global = true)]
	api_key: Option<String>,
	/// Gives up on a completion after this many seconds.
	#[arg(long, env = "ROADMAP_TIMEOUT_SECS", global = true)]
	timeout_secs: Option<u64>,
	/// Log level
	#[arg(long, default_value = "info", global = true)]
	log_level: Level,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Runs the HTTP service.
	Serve {
		#[arg(long, env = "ROADMAP_ADDR", default_value = "0.0.0.0:4000")]
		addr: SocketAddr,
	},
	/// Prints a skill graph and its Mermaid diagram.
	Graph {
		topic: String,
		#[arg(long)]
		difficulty: Option<String>,
		#[arg(long)]
		timeframe: Option<String>,
		/// `text` prints the Mermaid diagram only.
		#[arg(long, value_enum, default_value_t = Format::Json)]
		format: Format,
	},
	/// Prints a multi-phase roadmap.
	Phases {
		topic: String,
		#[arg(long)]
		difficulty: Option<String>,
		#[arg(long)]
		timeframe: Option<String>,
		/// `text` prints a plain text export of the phases.
		#[arg(long, value_enum, default_value_t = Format::Json)]
		format: Format,
	},
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
	Json,
	Text,
}

#[derive(Debug)]
struct RoadmapApp;
impl Config for RoadmapApp {
	type Llm = OpenAiLlm;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv::dotenv().ok();

	let args = Args::parse();

	let subscriber = fmt::Subscriber::builder().with_max_level(args.log_level).finish();
	tracing::subscriber::set_global_default(subscriber)?;

	info!(task = "tracing_setup", result = "success", "tracing successfully set up");

	let mut defaults = LlmConfig::new(args.model);
	if let Some(api_base) = args.api_base {
		defaults = defaults.with_endpoint(api_base.trim_end_matches('/'));
	}
	if let Some(api_key) = args.api_key {
		defaults = defaults.with_credential(api_key);
	}
	if let Some(secs) = args.timeout_secs {
		defaults = defaults.with_timeout(Duration::from_secs(secs));
	}

	let loom = Arc::new(Loom::<RoadmapApp>::new(OpenAiLlm::new(&defaults), defaults));

	match args.command {
		Command::Serve { addr } => service::serve(loom, addr).await?,
		Command::Graph { topic, difficulty, timeframe, format } => {
			let request = RoadmapRequest { difficulty, timeframe, ..RoadmapRequest::new(topic) };
			let response = loom.weave_graph(request).await?;
			match format {
				Format::Json => println!("{}", serde_json::to_string_pretty(&response)?),
				Format::Text => print!("{}", response.mermaid_diagram),
			}
		},
		Command::Phases { topic, difficulty, timeframe, format } => {
			let request = RoadmapRequest { difficulty, timeframe, ..RoadmapRequest::new(topic) };
			let response = loom.weave_phases(request).await?;
			match format {
				Format::Json => println!("{}", serde_json::to_string_pretty(&response)?),
				Format::Text => {
					print!("{}", text::render_phases(&response, chrono::Local::now().date_naive()))
				},
			}
		},
	}

	Ok(())
}
