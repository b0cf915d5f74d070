//! CSV download helper shared by the export endpoints.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::ServerError;

pub(crate) fn csv_attachment(
    filename: &str,
    columns: &[&str],
    rows: Vec<Vec<String>>,
) -> Result<Response, ServerError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns)
        .map_err(|err| ServerError::Generic(format!("csv export failed: {err}")))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|err| ServerError::Generic(format!("csv export failed: {err}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ServerError::Generic(format!("csv export failed: {err}")))?;
    let body = String::from_utf8(bytes)
        .map_err(|err| ServerError::Generic(format!("csv export failed: {err}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
