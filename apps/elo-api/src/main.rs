use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = elo_api::Args::parse();

	elo_api::run(args).await
}
