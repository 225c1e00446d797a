use crate::{
    relation::{self, Loader},
    schema::{self, Schema},
    stmt::{Query, Value},
    Db, Entity, Related, Result,
};

use async_recursion::async_recursion;
use indexmap::{IndexMap, IndexSet};
use std::{collections::HashMap, sync::Arc};

/// Extra constraint applied to the query of an eager loaded relationship.
pub(crate) type Constraint = Arc<dyn Fn(&mut Query) + Send + Sync>;

/// Constraints by dotted relationship path.
pub(crate) type Constraints = IndexMap<String, Constraint>;

/// Requested relationships as a tree of names.
///
/// `"post.comments"` requests `post` and, under it, `comments`. A name is
/// kept once, at its first occurrence.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Includes {
    children: IndexMap<String, Includes>,
}

impl Includes {
    pub(crate) fn insert(&mut self, path: &str) {
        let mut node = self;

        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            node = node.children.entry(segment.to_string()).or_default();
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Check every name against the relationships its model declares.
    pub(crate) fn validate(&self, schema: &Schema, model: &schema::Model) -> Result<()> {
        for (name, nested) in &self.children {
            let relation = model.relation(name)?;
            nested.validate(schema, schema.model(relation.target))?;
        }

        Ok(())
    }
}

/// Load `includes` onto `parents`, one query per relationship level.
///
/// Every parent ends up with a value for each requested relationship, empty
/// when nothing matched. Any failing query fails the whole load.
#[async_recursion]
pub(crate) async fn eager_load(
    db: &Db,
    model: &schema::Model,
    parents: &mut [Entity],
    includes: &Includes,
    constraints: &Constraints,
    path: &str,
) -> Result<()> {
    if parents.is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = includes.children.keys().map(String::as_str).collect();

    for name in model.eager_order(&names) {
        let relation = model.relation(name)?;
        let related = db.schema().model(relation.target).clone();

        let path = match path {
            "" => name.to_string(),
            _ => format!("{path}.{name}"),
        };

        let parent_column = relation::parent_column(model, relation);

        let keys: IndexSet<&Value> = parents
            .iter()
            .filter_map(|parent| parent.get(parent_column))
            .filter(|key| !key.is_null())
            .collect();

        let mut children = if keys.is_empty() {
            vec![]
        } else {
            let mut query = relation::base_query(&related, relation);
            query.filter_in(relation::constrained_column(&related, relation), keys);

            if let Some(constraint) = constraints.get(&path) {
                constraint(&mut query);
            }

            let loader = Loader::new(&related, relation);

            db.select(&query)
                .await?
                .into_iter()
                .map(|row| loader.entity(row))
                .collect::<Vec<_>>()
        };

        tracing::trace!(
            model = %model.name,
            relation = %path,
            rows = children.len(),
            "eager loaded"
        );

        if let Some(nested) = includes.children.get(name).filter(|nested| !nested.is_empty()) {
            eager_load(db, &related, &mut children, nested, constraints, &path).await?;
        }

        let mut dictionary: HashMap<Value, Vec<Entity>> = HashMap::new();
        for child in children {
            let key = relation::child_key(&related, relation, &child)
                .filter(|key| !key.is_null())
                .cloned();

            // Unmatched children are dropped
            if let Some(key) = key {
                dictionary.entry(key).or_default().push(child);
            }
        }

        for parent in parents.iter_mut() {
            let matched = parent
                .get(parent_column)
                .and_then(|key| dictionary.get(key));

            let value = match (relation.is_single(), matched) {
                (true, Some(matched)) => Related::One(matched.first().cloned().map(Box::new)),
                (true, None) => Related::One(None),
                (false, Some(matched)) => Related::Many(matched.clone()),
                (false, None) => Related::Many(vec![]),
            };

            parent.set_related(name, value);
        }
    }

    Ok(())
}
