// Colonist
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Stack-based instruction sequences for method bodies
//!
//! Method bodies are explicit instruction lists rather than raw encoded
//! bytes, which keeps generation logic declarative and lets tests assert on
//! instruction sequences directly. The maximum operand-stack depth is
//! computed here instead of being supplied by emitters.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, CoreResult};
use crate::types::{MethodDescriptor, TypeRef};

/// Identifier of a position marked with [`Instruction::Label`]
pub type LabelId = u32;

/// One stack-machine instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Marks a branch target; emits no code
    Label(LabelId),
    PushNull,
    /// Pushes the class literal of a type
    PushType(TypeRef),
    PushString(String),
    /// Allocates an instance without invoking a constructor
    New(TypeRef),
    Dup,
    Pop,
    Swap,
    LoadThis,
    LoadArg(u16),
    CheckCast(TypeRef),
    GetStatic {
        owner: TypeRef,
        field: String,
        field_type: TypeRef,
    },
    InvokeStatic {
        owner: TypeRef,
        method: MethodDescriptor,
    },
    InvokeVirtual {
        owner: TypeRef,
        method: MethodDescriptor,
    },
    /// Constructor and private-method invocation
    InvokeSpecial {
        owner: TypeRef,
        method: MethodDescriptor,
    },
    InvokeInterface {
        owner: TypeRef,
        method: MethodDescriptor,
    },
    Jump(LabelId),
    IfNull(LabelId),
    IfNonNull(LabelId),
    IfRefEq(LabelId),
    IfRefNe(LabelId),
    /// Returns from a void method
    Return,
    /// Returns the top of the stack
    ReturnValue,
    Throw,
}

/// An exception-handler region delimited by labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryCatch {
    pub start: LabelId,
    pub end: LabelId,
    pub handler: LabelId,
    pub exception_type: TypeRef,
}

/// A complete method body with its computed stack requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodBody {
    pub max_stack: u16,
    pub instructions: Vec<Instruction>,
    pub try_catches: Vec<TryCatch>,
}

impl MethodBody {
    /// Builds a body, computing `max_stack` from the instruction sequence
    pub fn compute(instructions: Vec<Instruction>, try_catches: Vec<TryCatch>) -> CoreResult<Self> {
        let max_stack = compute_max_stack(&instructions, &try_catches)?;
        Ok(Self {
            max_stack,
            instructions,
            try_catches,
        })
    }
}

/// Computes the maximum operand-stack depth of an instruction sequence.
///
/// Walks every reachable path with a worklist, seeding exception handlers
/// with a depth of one (the thrown value). Underflow, unresolved labels and
/// duplicate labels are hard errors.
pub fn compute_max_stack(instructions: &[Instruction], try_catches: &[TryCatch]) -> CoreResult<u16> {
    let mut labels: HashMap<LabelId, usize> = HashMap::new();
    for (position, instruction) in instructions.iter().enumerate() {
        if let Instruction::Label(label) = instruction {
            if labels.insert(*label, position).is_some() {
                return Err(CoreError::DuplicateLabel { label: *label });
            }
        }
    }

    let resolve = |label: LabelId| -> CoreResult<usize> {
        labels.get(&label).copied().ok_or(CoreError::UnresolvedLabel { label })
    };

    let mut worklist: Vec<(usize, u32)> = vec![(0, 0)];
    for try_catch in try_catches {
        worklist.push((resolve(try_catch.handler)?, 1));
    }

    let mut visited: HashSet<usize> = HashSet::new();
    let mut max_depth: u32 = 0;

    while let Some((mut position, mut depth)) = worklist.pop() {
        loop {
            if position >= instructions.len() {
                break;
            }
            if !visited.insert(position) {
                break;
            }

            let instruction = &instructions[position];
            let (pops, pushes) = stack_effect(instruction);
            if depth < pops {
                return Err(CoreError::StackUnderflow { position });
            }
            depth = depth - pops + pushes;
            max_depth = max_depth.max(depth);

            match instruction {
                Instruction::Jump(label) => {
                    position = resolve(*label)?;
                }
                Instruction::IfNull(label)
                | Instruction::IfNonNull(label)
                | Instruction::IfRefEq(label)
                | Instruction::IfRefNe(label) => {
                    worklist.push((resolve(*label)?, depth));
                    position += 1;
                }
                Instruction::Return | Instruction::ReturnValue | Instruction::Throw => break,
                _ => position += 1,
            }
        }
    }

    Ok(max_depth as u16)
}

fn stack_effect(instruction: &Instruction) -> (u32, u32) {
    match instruction {
        Instruction::Label(_) | Instruction::Jump(_) | Instruction::Return => (0, 0),
        Instruction::PushNull
        | Instruction::PushType(_)
        | Instruction::PushString(_)
        | Instruction::New(_)
        | Instruction::LoadThis
        | Instruction::LoadArg(_)
        | Instruction::GetStatic { .. } => (0, 1),
        Instruction::Dup => (1, 2),
        Instruction::Pop
        | Instruction::IfNull(_)
        | Instruction::IfNonNull(_)
        | Instruction::ReturnValue
        | Instruction::Throw => (1, 0),
        Instruction::Swap => (2, 2),
        Instruction::CheckCast(_) => (1, 1),
        Instruction::IfRefEq(_) | Instruction::IfRefNe(_) => (2, 0),
        Instruction::InvokeStatic { method, .. } => invoke_effect(method, false),
        Instruction::InvokeVirtual { method, .. }
        | Instruction::InvokeSpecial { method, .. }
        | Instruction::InvokeInterface { method, .. } => invoke_effect(method, true),
    }
}

fn invoke_effect(method: &MethodDescriptor, has_receiver: bool) -> (u32, u32) {
    let pops = method.signature.parameters.len() as u32 + u32::from(has_receiver);
    let pushes = u32::from(method.signature.return_type.is_some());
    (pops, pushes)
}
