pub mod css;
pub mod dom;
pub mod error;
pub mod options;
mod prepare;
pub mod smil;

pub use css::render_css_animated_svg;
pub use error::{ExportError, ExportResult};
pub use options::ExportOptions;
pub use smil::render_smil_animated_svg;

/// The two animated-SVG flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    #[default]
    Css,
    Smil,
}

impl ExportMode {
    /// Dispatch to the matching exporter.
    pub fn render(
        self,
        svg: &str,
        animations: &[sa_core::AnimationDescriptor],
        options: &ExportOptions,
    ) -> ExportResult<String> {
        match self {
            ExportMode::Css => render_css_animated_svg(svg, animations, options),
            ExportMode::Smil => render_smil_animated_svg(svg, animations, options),
        }
    }
}

impl std::str::FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "css" => Ok(ExportMode::Css),
            "smil" => Ok(ExportMode::Smil),
            other => Err(format!("unknown export mode {other:?}")),
        }
    }
}
