use std::path::{Path, PathBuf};

use clap::Parser;
use gvision_client::FeatureKind;

#[derive(Parser, Debug)]
#[command(
    name = "gvision",
    version,
    about = "Annotate an image with the Google Cloud Vision API and print the JSON result."
)]
pub struct Cli {
    /// Type of image feature.
    #[arg(short = 't', long = "type", value_name = "FEATURE", default_value = "FACE_DETECTION")]
    pub feature: FeatureKind,

    /// Image file to annotate. When several are given only the last is used.
    #[arg(value_name = "IMAGE", required = true, num_args = 1..)]
    pub images: Vec<PathBuf>,

    /// Base URL of the annotation API, e.g. for an emulator.
    #[arg(long, value_name = "URL", hide = true)]
    pub endpoint: Option<String>,
}

impl Cli {
    pub fn image_path(&self) -> Option<&Path> {
        self.images.last().map(PathBuf::as_path)
    }
}
