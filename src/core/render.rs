use crate::domain::model::{DisplayUnit, GraphType};
use crate::domain::ports::{DecodedObject, StatusLog};
use crate::utils::error::ViewerError;
use std::path::Path;

/// 將解碼後的物件轉成分頁；圖形失敗只影響該物件
pub fn render(
    objects: &[Box<dyn DecodedObject>],
    source: &Path,
    log: &dyn StatusLog,
) -> Vec<DisplayUnit> {
    let mut units = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        render_object(index, object.as_ref(), source, log, &mut units);
    }

    tracing::debug!(
        "Rendered {} object(s) into {} unit(s)",
        objects.len(),
        units.len()
    );
    units
}

pub fn render_object(
    index: usize,
    object: &dyn DecodedObject,
    source: &Path,
    log: &dyn StatusLog,
    units: &mut Vec<DisplayUnit>,
) {
    let label = object.simple_type_name();
    let body = format!("{}\n\n{}\n", object.type_name(), object);
    units.push(DisplayUnit::primary(index, label, body));

    let Some(drawable) = object.as_drawable() else {
        return;
    };
    if drawable.graph_type() == GraphType::NotDrawable {
        tracing::trace!("Object #{} ({}) is not drawable", index, label);
        return;
    }

    match drawable.graph() {
        Ok(graph) => units.push(DisplayUnit::graph(index, label, &graph)),
        Err(source_error) => {
            let error = ViewerError::Graph {
                type_name: object.type_name().to_string(),
                source: source_error,
            };
            let message = format!(
                "{} (object #{} in {})",
                error,
                index + 1,
                source.display()
            );
            tracing::error!("❌ {}", message);
            log.log_message(&message);
        }
    }
}
