use anyhow::Context;
use cardqr::cli::Cli;
use cardqr::{generate_card, logger, CardError, ExportBundle};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        tracing::error!("❌ {:#}", e);
        if let Some(card_error) = e.downcast_ref::<CardError>() {
            tracing::error!("💡 {}", card_error.recovery_hint());
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve()?;
    tracing::debug!("Resolved config: {:?}", config);

    let card = generate_card(&config.contact, config.mode, &config.imager)?;
    tracing::info!(
        "QR version {} ({}x{} px) in {:?} mode",
        card.image.version().value(),
        card.image.width(),
        card.image.width(),
        config.mode
    );

    if cli.preview {
        print!("{}", card.image.to_text_preview());
    }

    let timestamp = chrono::Local::now().naive_local();
    let bundle = ExportBundle::from_card(&card, &config.contact.full_name, &timestamp)?;
    let (record_path, image_path) = bundle
        .write_to(&config.output_path)
        .with_context(|| format!("writing card files to {}", config.output_path))?;

    println!("✅ Contact saved to: {}", record_path.display());
    println!("✅ QR code saved to: {}", image_path.display());
    Ok(())
}
