/// External SBOM generator integration
///
/// `ManifestGenerator` is the seam the manifest adapter talks to; `SbomTool`
/// runs an `sbom-tool`-compatible executable.
pub mod generator_interface;
pub mod sbom_tool;

pub use generator_interface::{
    GeneratorOutput, ManifestGenerator, ManifestGeneratorError, ManifestRequest,
};
pub use sbom_tool::{SbomTool, SbomToolConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_TOOL};

#[cfg(test)]
pub use generator_interface::MockManifestGenerator;
