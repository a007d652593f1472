//! In-memory reference backend.
//!
//! Records live in per-entity vectors behind a `parking_lot::RwLock`.
//! Concurrent readers proceed in parallel; writers take the lock briefly and
//! never hold it across an await point. Useful for tests and as the
//! smallest complete template for a real backend.

use std::cmp::Ordering;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::model::{AttributeValue, EntityName, ModelData, ObjectId};
use crate::schema::Model;
use crate::{Error, Result};

use super::{FetchRequest, ModelStorage, SortDescriptor};

/// Schema-validating in-memory store.
pub struct InMemoryStore {
    model: Model,
    records: RwLock<HashMap<EntityName, Vec<ModelData>>>,
}

impl InMemoryStore {
    pub fn new(model: Model) -> Self {
        let records = model
            .entities()
            .iter()
            .map(|entity| (entity.id.clone(), Vec::new()))
            .collect();
        Self {
            model,
            records: RwLock::new(records),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    fn check_entity(&self, entity: &EntityName) -> Result<()> {
        if self.model.entity(entity).is_none() {
            return Err(Error::InvalidEntity(entity.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl ModelStorage for InMemoryStore {
    async fn fetch(&self, entity: &EntityName, id: &ObjectId) -> Result<Option<ModelData>> {
        self.check_entity(entity)?;
        let records = self.records.read();
        let found = records
            .get(entity)
            .and_then(|records| records.iter().find(|r| &r.id == id))
            .cloned();
        trace!(%entity, %id, found = found.is_some(), "fetch");
        Ok(found)
    }

    async fn fetch_all(&self, request: &FetchRequest) -> Result<Vec<ModelData>> {
        self.check_entity(&request.entity)?;
        let records = self.records.read();
        let candidates = records.get(&request.entity).map(Vec::as_slice).unwrap_or(&[]);

        let mut matched = Vec::new();
        for record in candidates {
            let keep = match &request.predicate {
                Some(predicate) => predicate.evaluate(record)?,
                None => true,
            };
            if keep {
                matched.push(record.clone());
            }
        }
        drop(records);

        sort_records(&mut matched, &request.sort_descriptors)?;

        let mut windowed: Vec<ModelData> = matched
            .into_iter()
            .skip(request.fetch_offset)
            .collect();
        if request.fetch_limit > 0 {
            windowed.truncate(request.fetch_limit);
        }
        trace!(entity = %request.entity, matched = windowed.len(), "fetch_all");
        Ok(windowed)
    }

    async fn insert(&self, data: ModelData) -> Result<()> {
        self.check_entity(&data.entity)?;
        debug!(entity = %data.entity, id = %data.id, "insert");
        let mut records = self.records.write();
        let records = records.entry(data.entity.clone()).or_default();
        match records.iter_mut().find(|r| r.id == data.id) {
            Some(existing) => *existing = data,
            None => records.push(data),
        }
        Ok(())
    }

    async fn delete(&self, entity: &EntityName, id: &ObjectId) -> Result<bool> {
        self.check_entity(entity)?;
        let mut records = self.records.write();
        let Some(records) = records.get_mut(entity) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|r| &r.id != id);
        let deleted = records.len() != before;
        debug!(%entity, %id, deleted, "delete");
        Ok(deleted)
    }
}

// ============================================================================
// Sorting
// ============================================================================

fn sort_records(records: &mut [ModelData], descriptors: &[SortDescriptor]) -> Result<()> {
    if descriptors.is_empty() {
        return Ok(());
    }
    let mut failure = None;
    records.sort_by(|a, b| {
        for descriptor in descriptors {
            match compare_by(a, b, descriptor) {
                Ok(Ordering::Equal) => continue,
                Ok(ordering) => return ordering,
                Err(error) => {
                    failure.get_or_insert(error);
                    return Ordering::Equal;
                }
            }
        }
        Ordering::Equal
    });
    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn compare_by(a: &ModelData, b: &ModelData, descriptor: &SortDescriptor) -> Result<Ordering> {
    let value_of = |record: &ModelData| {
        if descriptor.property.as_str() == "id" {
            AttributeValue::String(record.id.as_str().to_owned())
        } else {
            record
                .attribute(&descriptor.property)
                .cloned()
                .unwrap_or(AttributeValue::Null)
        }
    };
    let va = value_of(a);
    let vb = value_of(b);

    let ordering = if va.is_null() && vb.is_null() {
        Ordering::Equal
    } else {
        va.same_case_cmp(&vb)
            .ok_or_else(|| Error::UnsupportedComparison {
                left: va.to_string(),
                operator: "<".to_owned(),
                right: vb.to_string(),
            })?
    };
    Ok(if descriptor.ascending {
        ordering
    } else {
        ordering.reverse()
    })
}
