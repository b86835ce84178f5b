//! Extension installation and inspection helpers.

use diesel::prelude::QueryableByName;
use diesel::sql_types::Text;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use lantern::Extension;

use crate::{ClientResult, TRACING_TARGET_MIGRATE};

#[derive(QueryableByName)]
struct ExtensionRow {
    #[diesel(sql_type = Text)]
    extversion: String,
}

/// Installs an extension, idempotently.
///
/// Issues `CREATE EXTENSION IF NOT EXISTS <name>`; an already-installed
/// extension is left untouched. Requires a role with the privilege to
/// create extensions.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATE)]
pub async fn install_extension(
    conn: &mut AsyncPgConnection,
    extension: Extension,
) -> ClientResult<()> {
    diesel::sql_query(extension.create_statement())
        .execute(conn)
        .await?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATE,
        extension = %extension,
        "Extension installed"
    );

    Ok(())
}

/// Installs several extensions in order, idempotently.
pub async fn install_extensions(
    conn: &mut AsyncPgConnection,
    extensions: &[Extension],
) -> ClientResult<()> {
    for extension in extensions {
        install_extension(conn, *extension).await?;
    }
    Ok(())
}

/// Returns the installed version of an extension, or `None` when it is
/// not installed.
pub async fn installed_extension_version(
    conn: &mut AsyncPgConnection,
    extension: Extension,
) -> ClientResult<Option<String>> {
    let rows: Vec<ExtensionRow> =
        diesel::sql_query("SELECT extversion FROM pg_extension WHERE extname = $1")
            .bind::<Text, _>(extension.name())
            .load(conn)
            .await?;

    Ok(rows.into_iter().next().map(|row| row.extversion))
}

/// Returns whether an extension is installed.
pub async fn extension_installed(
    conn: &mut AsyncPgConnection,
    extension: Extension,
) -> ClientResult<bool> {
    Ok(installed_extension_version(conn, extension).await?.is_some())
}
