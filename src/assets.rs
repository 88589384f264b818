use crate::error::Error;
use crate::serializer::write_to_file;
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

const SWAGGER_UI_TEMPLATE: &str = "index.html";

/// Swagger UI template data
#[derive(Serialize)]
struct SwaggerUiTemplate<'a> {
    doc_file: &'a str,
}

/// Renders the bundled Swagger UI page pointed at `doc_file_name`.
pub fn render_swagger_ui(doc_file_name: &str) -> crate::error::Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(
        SWAGGER_UI_TEMPLATE,
        include_str!("../assets/swagger-ui/index.html"),
    )?;

    let context = Context::from_serialize(SwaggerUiTemplate {
        doc_file: doc_file_name,
    })?;
    tera.render(SWAGGER_UI_TEMPLATE, &context)
        .map_err(Error::from)
}

/// Writes the Swagger UI page into `swagger_dir`.
///
/// Returns the paths written.
pub fn write_assets(swagger_dir: &Path, doc_file_name: &str) -> Result<Vec<PathBuf>> {
    let index_path = swagger_dir.join(SWAGGER_UI_TEMPLATE);
    let page = render_swagger_ui(doc_file_name)?;

    write_to_file(&page, &index_path)?;
    debug!("Wrote Swagger UI page to {}", index_path.display());

    Ok(vec![index_path])
}
