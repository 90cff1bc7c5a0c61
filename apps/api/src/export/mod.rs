// Artifact export: turns the extracted block into a downloadable document.
// The renderer is a trait object carried in AppState, so the document
// format is swappable without touching session or chat code.

pub mod handlers;
pub mod html;
pub mod renderer;
