//! Per-call load driver.
//!
//! A [`Loader`] owns every piece of mutable state one `load` needs: the tree
//! builder with its path stack, the anchor table and the budget counters. It
//! is created per call and dropped on return, so concurrent loads never share
//! anything.

use crate::anchors::AnchorRegistry;
use crate::block::{self, PLACEHOLDER};
use crate::budget::{BudgetBreach, BudgetEnforcer, BudgetReport};
use crate::builder::{Builder, Slot};
use crate::classify::{Classified, Group, Unit, classify};
use crate::error::{Error, budget_error};
use crate::location::Location;
use crate::options::{Options, UnresolvedAliasPolicy};
use crate::parse_scalars::strip_trailing_comment;
use crate::scanner::{self, Line};
use crate::value::{Mapping, Value};

/// Result of one load, with the budget report when a budget was enforced.
pub(crate) struct LoadOutcome {
    pub(crate) result: Result<Value, Error>,
    pub(crate) report: Option<BudgetReport>,
}

pub(crate) struct Loader {
    options: Options,
    builder: Builder,
    anchors: AnchorRegistry,
    budget: Option<BudgetEnforcer>,
}

/// One logical line, ready for classification.
struct Logical<'a> {
    line: Line<'a>,
    content: String,
    block: Option<String>,
}

impl Loader {
    pub(crate) fn new(options: Options) -> Self {
        let budget = options.budget.clone().map(BudgetEnforcer::new);
        Self {
            builder: Builder::new(options.duplicate_keys),
            anchors: AnchorRegistry::default(),
            budget,
            options,
        }
    }

    pub(crate) fn run(mut self, input: &str) -> LoadOutcome {
        let mut result = self.load(input);
        let report = self.budget.take().map(|enforcer| match &result {
            Err(Error::Budget { breach, .. }) => enforcer.into_report(breach.clone()),
            _ => enforcer.finalize(),
        });

        if let Some(report) = &report {
            if let (Ok(_), Some(breach)) = (&result, &report.breached) {
                result = Err(budget_error(breach.clone()));
            }
            if matches!(result, Ok(_) | Err(Error::Budget { .. })) {
                self.options.deliver_report(report);
            }
        }
        LoadOutcome { result, report }
    }

    fn load(&mut self, input: &str) -> Result<Value, Error> {
        let text = scanner::normalize(input);
        let lines = scanner::split_lines(&text);

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            i += 1;
            self.observe_line(&line)?;
            if line.is_ignorable() {
                continue;
            }

            let mut logical = Logical {
                line,
                content: line.content().trim_end().to_owned(),
                block: None,
            };

            if let Some((header, replaced)) =
                block::detect_header(strip_trailing_comment(&logical.content))
            {
                let owner = line.indent + block::owner_offset(&replaced);
                let n = block::continuation_len(&lines[i..], owner);
                for extra in &lines[i..i + n] {
                    self.observe_line(extra)?;
                }
                logical.block = Some(block::assemble(header, &lines[i..i + n], owner));
                logical.content = replaced;
                i += n;
            }

            while i < lines.len()
                && block::needs_next_line(strip_trailing_comment(&logical.content))
            {
                self.observe_line(&lines[i])?;
                logical.content = format!(
                    "{} {}",
                    strip_trailing_comment(&logical.content).trim_end(),
                    lines[i].raw.trim_start()
                );
                i += 1;
            }

            if !logical.content.contains(['"', '\'']) {
                let stripped = strip_trailing_comment(&logical.content).len();
                logical.content.truncate(stripped);
            }

            self.handle(logical)?;
        }

        let fresh = Builder::new(self.options.duplicate_keys);
        Ok(std::mem::replace(&mut self.builder, fresh).finish())
    }

    fn observe_line(&mut self, line: &Line<'_>) -> Result<(), Error> {
        if let Some(budget) = &mut self.budget {
            budget
                .observe_line()
                .map_err(|breach| budget_error(breach).with_location(line_location(line)))?;
        }
        Ok(())
    }

    fn handle(&mut self, logical: Logical<'_>) -> Result<(), Error> {
        let line = logical.line;
        let location = line_location(&line);
        self.spend(location, |b| {
            b.record_scalar(logical.content.len() + logical.block.as_ref().map_or(0, String::len))
        })?;

        let Classified {
            mut unit,
            group,
            group_offset,
        } = classify(&logical.content);

        if let Some(text) = &logical.block {
            replace_placeholder(&mut unit, text);
        }

        let group_location = Location::new(
            line.number,
            line.indent + logical.content[..group_offset.min(logical.content.len())].chars().count() + 1,
        );
        let anchor = match group {
            Some(Group::Anchor(name)) => Some(name),
            Some(Group::Alias(name)) => {
                let value = self.resolve_alias(&name, group_location)?;
                unit = with_alias(unit, value);
                None
            }
            None => None,
        };

        let indent = line.indent;
        let placed = match unit {
            Unit::Empty => {
                log::debug!("line {} holds no value", line.number);
                None
            }
            Unit::MappedSequence { key, key_offset } => {
                let mut item = Mapping::with_capacity(1);
                item.insert(key.clone(), Value::Sequence(Vec::new()));
                let placed = self
                    .builder
                    .add(indent, Slot::Positional, Value::Mapping(item), true, false)
                    .map_err(|e| e.with_location(location))?;
                self.builder.schedule(indent + key_offset, key);
                placed
            }
            Unit::MappedValue { key, .. } => self
                .builder
                .add(indent, Slot::Named(key), Value::Null, false, true)
                .map_err(|e| e.with_location(location))?,
            Unit::Pair {
                value, merge: true, ..
            }
            | Unit::Merge(value) => {
                self.spend(location, BudgetEnforcer::record_merge)?;
                self.builder
                    .merge(indent, value)
                    .map_err(|e| e.with_location(location))?;
                None
            }
            Unit::Pair { key, value, .. } => self
                .builder
                .add(indent, Slot::Named(key), value, false, false)
                .map_err(|e| e.with_location(location))?,
            Unit::Item(value) => self
                .builder
                .add(indent, Slot::Positional, value, true, false)
                .map_err(|e| e.with_location(location))?,
            Unit::Scalar(value) => self
                .builder
                .add(indent, Slot::Positional, value, false, false)
                .map_err(|e| e.with_location(location))?,
            Unit::FlowItems(items) => self
                .builder
                .add_all(indent, items)
                .map_err(|e| e.with_location(location))?,
        };

        let depth = self.builder.depth();
        self.spend(location, |b| b.observe_depth(depth))?;

        if let (Some(name), Some(path)) = (anchor, placed) {
            self.spend(group_location, |b| b.record_anchor(&name))?;
            self.anchors.record(&name, path);
        }
        Ok(())
    }

    fn resolve_alias(&mut self, name: &str, location: Location) -> Result<Value, Error> {
        match self.anchors.resolve(name, self.builder.root()) {
            Some(value) => {
                let nodes = value.node_count();
                self.spend(location, |b| b.record_alias(nodes))?;
                Ok(value)
            }
            None => match self.options.unresolved_aliases {
                UnresolvedAliasPolicy::Null => {
                    log::warn!(
                        "alias *{name} at line {} has no anchor; using null",
                        location.line()
                    );
                    Ok(Value::Null)
                }
                _ => Err(Error::UnresolvedAlias {
                    name: name.to_owned(),
                    location,
                }),
            },
        }
    }

    /// Charge the budget, if any, attaching `location` to a breach.
    fn spend(
        &mut self,
        location: Location,
        charge: impl FnOnce(&mut BudgetEnforcer) -> Result<(), BudgetBreach>,
    ) -> Result<(), Error> {
        match &mut self.budget {
            Some(budget) => {
                charge(budget).map_err(|breach| budget_error(breach).with_location(location))
            }
            None => Ok(()),
        }
    }
}

fn line_location(line: &Line<'_>) -> Location {
    Location::new(line.number, line.indent + 1)
}

/// Put an alias value in place of whatever the line would have stored.
fn with_alias(unit: Unit, value: Value) -> Unit {
    match unit {
        Unit::MappedValue { merge: true, .. } | Unit::Pair { merge: true, .. } => {
            Unit::Merge(value)
        }
        Unit::MappedValue { key, .. } | Unit::Pair { key, .. } => Unit::Pair {
            key,
            value,
            merge: false,
        },
        Unit::Item(_) => Unit::Item(value),
        Unit::Scalar(_) | Unit::Empty => Unit::Scalar(value),
        other => {
            log::warn!("alias ignored on a line that cannot hold a single value");
            other
        }
    }
}

/// Swap the block placeholder for the collected block text, at any depth.
fn replace_placeholder(unit: &mut Unit, text: &str) {
    match unit {
        Unit::Item(v) | Unit::Scalar(v) | Unit::Merge(v) | Unit::Pair { value: v, .. } => {
            replace_in_value(v, text)
        }
        Unit::FlowItems(items) => items.iter_mut().for_each(|v| replace_in_value(v, text)),
        Unit::MappedSequence { .. } | Unit::MappedValue { .. } | Unit::Empty => {}
    }
}

fn replace_in_value(value: &mut Value, text: &str) {
    match value {
        Value::String(s) if s.ends_with(PLACEHOLDER) => *s = text.to_owned(),
        Value::Sequence(items) => items.iter_mut().for_each(|v| replace_in_value(v, text)),
        Value::Mapping(m) => m.iter_mut().for_each(|(_, v)| replace_in_value(v, text)),
        _ => {}
    }
}
