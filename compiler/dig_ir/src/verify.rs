//! Debug-info consistency checks over a whole module.

use crate::error::VerifyError;
use crate::metadata::{MetadataGraph, MetadataId, NodeData, NodeKind};
use crate::module::Module;
use crate::value::{DebugLoc, Opcode, ValueId};

impl Module {
    /// Check the debug info attached to this module.
    ///
    /// Reports every problem found rather than stopping at the first:
    /// dangling node operands, unresolved composite types, function
    /// attachments that are not subprograms, instruction locations outside
    /// their function's subprogram, and malformed `dbg.declare` operands.
    pub fn verify(&self) -> Result<(), VerifyError> {
        let graph = self.metadata();
        let mut problems = Vec::new();

        check_graph(&graph, &mut problems);
        for function in self.functions() {
            self.check_function(&graph, function, &mut problems);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = problems.len(), "module failed verification");
            Err(VerifyError { problems })
        }
    }

    fn check_function(&self, graph: &MetadataGraph, function: ValueId, problems: &mut Vec<String>) {
        let name = self.value_name(function).unwrap_or_default();
        let subprogram = self.subprogram(function);
        if let Some(sp) = subprogram {
            if graph.kind(sp) != Some(NodeKind::Subprogram) {
                problems.push(format!(
                    "function '{name}' has a debug attachment {sp:?} that is not a subprogram"
                ));
            }
        }

        for block in self.function_blocks(function) {
            for id in self.block_instructions(block) {
                let Some(inst) = self.instruction(id) else {
                    continue;
                };
                if let Some(loc) = inst.debug_loc {
                    check_location(graph, &name, subprogram, id, loc, problems);
                }
                if let Opcode::DbgDeclare {
                    storage,
                    variable,
                    expression,
                } = inst.opcode
                {
                    if self.value_kind(storage).is_none() {
                        problems.push(format!("dbg.declare {id:?} has unknown storage {storage:?}"));
                    }
                    if graph.kind(variable) != Some(NodeKind::LocalVariable) {
                        problems.push(format!(
                            "dbg.declare {id:?} variable {variable:?} is not a local variable"
                        ));
                    }
                    if graph.kind(expression) != Some(NodeKind::Expression) {
                        problems.push(format!(
                            "dbg.declare {id:?} expression {expression:?} is not an expression"
                        ));
                    }
                    if inst.debug_loc.is_none() {
                        problems.push(format!("dbg.declare {id:?} has no debug location"));
                    }
                }
            }
        }
    }
}

fn check_graph(graph: &MetadataGraph, problems: &mut Vec<String>) {
    for (id, data) in graph.iter() {
        for op in data.operands() {
            if !graph.contains(op) {
                problems.push(format!("{} {id:?} refers to missing node {op:?}", data.kind()));
            }
        }
        if let NodeData::CompositeType(c) = data {
            if c.elements.is_none() {
                problems.push(format!(
                    "composite type '{}' {id:?} is an unresolved forward declaration",
                    c.name
                ));
            }
        }
    }
}

fn check_location(
    graph: &MetadataGraph,
    function_name: &str,
    subprogram: Option<MetadataId>,
    inst: ValueId,
    loc: DebugLoc,
    problems: &mut Vec<String>,
) {
    let Some(kind) = graph.kind(loc.scope) else {
        problems.push(format!("{inst:?} location scope {:?} does not exist", loc.scope));
        return;
    };
    if !kind.is_local_scope() {
        problems.push(format!(
            "{inst:?} location scope {:?} is a {kind}, not a local scope",
            loc.scope
        ));
        return;
    }
    // Inlined locations belong to the callee's subprogram.
    if loc.inlined_at.is_some() {
        return;
    }
    let owner = graph.subprogram_of(loc.scope);
    match subprogram {
        None => problems.push(format!(
            "{inst:?} has a debug location but function '{function_name}' has no subprogram"
        )),
        Some(sp) if owner != Some(sp) => problems.push(format!(
            "{inst:?} location scope belongs to {owner:?}, not to the subprogram {sp:?} of '{function_name}'"
        )),
        Some(_) => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
