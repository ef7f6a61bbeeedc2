use std::path::PathBuf;

use clap::Parser;

use crate::config::CardConfig;
use crate::error::Result;
use crate::payload::PayloadMode;
use crate::qrcode::EcLevel;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cardqr", version)]
#[command(about = "Generate a vCard and a QR code for a digital business card")]
pub struct Cli {
    #[arg(long, help = "TOML settings file; flags override its values")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Full name")]
    pub name: Option<String>,

    #[arg(long, help = "Title or role")]
    pub title: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long, help = "Social profile URL, encoded in url mode when no website is given")]
    pub profile_url: Option<String>,

    #[arg(long, value_enum, help = "What the QR code carries")]
    pub mode: Option<PayloadMode>,

    #[arg(long, help = "Pixels per QR module")]
    pub module_px: Option<u32>,

    #[arg(long, help = "Quiet zone width in modules")]
    pub quiet_zone: Option<u32>,

    #[arg(long, value_enum)]
    pub ec_level: Option<EcLevel>,

    #[arg(long, help = "Directory for the .vcf and .png files")]
    pub output_path: Option<String>,

    #[arg(long, help = "Print the QR code to the terminal")]
    pub preview: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    /// Built-in defaults, then the config file, then flags. Contact fields come back trimmed.
    pub fn resolve(&self) -> Result<CardConfig> {
        let mut config = match &self.config {
            Some(path) => CardConfig::from_file(path)?,
            None => CardConfig::default(),
        };

        let contact = &mut config.contact;
        let overrides = [
            (&mut contact.full_name, &self.name),
            (&mut contact.title, &self.title),
            (&mut contact.company, &self.company),
            (&mut contact.phone, &self.phone),
            (&mut contact.email, &self.email),
            (&mut contact.location, &self.location),
            (&mut contact.website, &self.website),
            (&mut contact.profile_url, &self.profile_url),
        ];
        for (field, flag) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        config.contact = config.contact.trimmed();

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(module_px) = self.module_px {
            config.imager.module_px = module_px;
        }
        if let Some(quiet_zone) = self.quiet_zone {
            config.imager.quiet_zone_modules = quiet_zone;
        }
        if let Some(ec_level) = self.ec_level {
            config.imager.ec_level = ec_level;
        }
        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
