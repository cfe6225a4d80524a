//! Readers of the input tables.

use std::path::Path;

use solidago_core::errors::DataError;
use solidago_core::model::{
    Assessment, Assessments, Comparisons, Entities, Entity, MadePublic, PipelineInput, User, Users,
    Vouch, Vouches,
};
use tracing::{info, instrument};

use crate::rows::{AssessmentRow, ComparisonRow, MadePublicRow, UserRow, VouchRow};
use crate::table::{open, read_optional_table, read_table};
use crate::{
    ASSESSMENTS_FILE, COMPARISONS_FILE, ENTITIES_FILE, MADE_PUBLIC_FILE, USERS_FILE, VOUCHES_FILE,
};

pub fn read_users(path: &Path) -> Result<Users, DataError> {
    Ok(users_from_rows(read_table(path)?))
}

fn users_from_rows(rows: Vec<UserRow>) -> Users {
    rows.into_iter()
        .map(|row| {
            let user = User::new(row.username, row.is_pretrusted);
            match row.trust_score {
                Some(trust) => user.with_trust(trust),
                None => user,
            }
        })
        .collect()
}

pub fn read_vouches(path: &Path) -> Result<Vouches, DataError> {
    vouches_from_rows(read_table(path)?)
}

fn vouches_from_rows(rows: Vec<VouchRow>) -> Result<Vouches, DataError> {
    let mut vouches = Vouches::new();
    for row in rows {
        if !row.weight.is_finite() || row.weight < 0.0 {
            return Err(DataError::invalid(
                "vouches",
                "weight",
                format!("{} -> {}: {}", row.by, row.to, row.weight),
            ));
        }
        let vouch = Vouch {
            weight: row.weight,
            priority: row.priority,
        };
        vouches.insert(&row.by, &row.to, &row.kind, vouch)?;
    }
    Ok(vouches)
}

/// Entities keyed by `entity_name`; every other column becomes metadata.
pub fn read_entities(path: &Path) -> Result<Entities, DataError> {
    let (mut reader, headers) = open(path, "entities", &["entity_name"])?;
    let name_column = headers
        .iter()
        .position(|h| h == "entity_name")
        .unwrap_or_default();
    let mut entities = Entities::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataError::MalformedRow {
            table: "entities".to_string(),
            line: e.position().map_or(0, |p| p.line()),
            message: e.to_string(),
        })?;
        let mut entity = Entity::new(record.get(name_column).unwrap_or_default());
        for (i, (column, value)) in headers.iter().zip(record.iter()).enumerate() {
            if i != name_column {
                entity.metadata.insert(column.to_string(), value.to_string());
            }
        }
        entities.insert(entity);
    }
    Ok(entities)
}

pub fn read_made_public(path: &Path) -> Result<MadePublic, DataError> {
    Ok(made_public_from_rows(read_table(path)?))
}

fn made_public_from_rows(rows: Vec<MadePublicRow>) -> MadePublic {
    let mut made_public = MadePublic::new();
    for row in rows {
        made_public.set(&row.username, &row.entity_name, row.public);
    }
    made_public
}

pub fn read_comparisons(path: &Path) -> Result<Comparisons, DataError> {
    comparisons_from_rows(read_table(path)?)
}

fn comparisons_from_rows(rows: Vec<ComparisonRow>) -> Result<Comparisons, DataError> {
    let mut comparisons = Comparisons::new();
    for row in rows {
        comparisons.insert(
            &row.username,
            &row.criterion,
            &row.left_name,
            &row.right_name,
            row.value,
            row.max,
        )?;
    }
    Ok(comparisons)
}

pub fn read_assessments(path: &Path) -> Result<Assessments, DataError> {
    assessments_from_rows(read_table(path)?)
}

fn assessments_from_rows(rows: Vec<AssessmentRow>) -> Result<Assessments, DataError> {
    let mut assessments = Assessments::new();
    for row in rows {
        let assessment = Assessment {
            value: row.value,
            min: row.min,
            max: row.max,
        };
        assessments.insert(&row.username, &row.criterion, &row.entity_name, assessment)?;
    }
    Ok(assessments)
}

/// Reads every input table of `dir`.
///
/// `comparisons.csv` is required; the other tables default to empty.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn load_input(dir: &Path) -> Result<PipelineInput, DataError> {
    let input = PipelineInput {
        users: users_from_rows(read_optional_table(&dir.join(USERS_FILE))?),
        vouches: vouches_from_rows(read_optional_table(&dir.join(VOUCHES_FILE))?)?,
        entities: if dir.join(ENTITIES_FILE).exists() {
            read_entities(&dir.join(ENTITIES_FILE))?
        } else {
            Entities::new()
        },
        made_public: made_public_from_rows(read_optional_table(&dir.join(MADE_PUBLIC_FILE))?),
        comparisons: read_comparisons(&dir.join(COMPARISONS_FILE))?,
        assessments: assessments_from_rows(read_optional_table(&dir.join(ASSESSMENTS_FILE))?)?,
    };
    info!(
        n_users = input.users.len(),
        n_vouches = input.vouches.len(),
        n_comparisons = input.comparisons.len(),
        n_assessments = input.assessments.len(),
        "input loaded"
    );
    Ok(input)
}

/// Users and vouches only, both optional.
pub fn load_population(dir: &Path) -> Result<(Users, Vouches), DataError> {
    Ok((
        users_from_rows(read_optional_table(&dir.join(USERS_FILE))?),
        vouches_from_rows(read_optional_table(&dir.join(VOUCHES_FILE))?)?,
    ))
}

/// `made_public.csv` of `dir`, empty when absent.
pub fn load_made_public(dir: &Path) -> Result<MadePublic, DataError> {
    Ok(made_public_from_rows(read_optional_table(&dir.join(MADE_PUBLIC_FILE))?))
}

/// `assessments.csv` of `dir`, empty when absent.
pub fn load_assessments(dir: &Path) -> Result<Assessments, DataError> {
    assessments_from_rows(read_optional_table(&dir.join(ASSESSMENTS_FILE))?)
}
