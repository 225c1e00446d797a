use super::{Model, Schema};
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for model in self.schema.models() {
            self.verify_relation_targets(model)?;
            self.verify_relation_dependencies(model)?;
        }

        Ok(())
    }

    fn verify_relation_targets(&self, model: &Model) -> Result<()> {
        for relation in model.relations.values() {
            if relation.target.0 >= self.schema.models().len() {
                return Err(Error::unknown_model(format!(
                    "target of `{}.{}`",
                    model.name, relation.name
                )));
            }
        }

        Ok(())
    }

    /// Dependencies must name declared relationships and must not loop.
    fn verify_relation_dependencies(&self, model: &Model) -> Result<()> {
        for relation in model.relations.values() {
            for dep in &relation.after {
                if *dep == relation.name {
                    return Err(Error::invalid_relationship_dependency(
                        &model.name,
                        &relation.name,
                        dep,
                    ));
                }

                if !model.relations.contains_key(dep) {
                    return Err(Error::unknown_relationship(&model.name, dep));
                }
            }
        }

        let mut done = HashSet::new();

        for name in model.relations.keys() {
            let mut path = vec![];
            visit(model, name, &mut path, &mut done)?;
        }

        Ok(())
    }
}

/// Depth-first walk over `after` edges, failing on the first back edge.
fn visit<'a>(
    model: &'a Model,
    name: &'a str,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Result<()> {
    if done.contains(name) {
        return Ok(());
    }

    if let Some(&from) = path.last() {
        if path.contains(&name) {
            return Err(Error::invalid_relationship_dependency(
                &model.name,
                from,
                name,
            ));
        }
    }

    path.push(name);

    for dep in &model.relations[name].after {
        visit(model, dep, path, done)?;
    }

    path.pop();
    done.insert(name);
    Ok(())
}
