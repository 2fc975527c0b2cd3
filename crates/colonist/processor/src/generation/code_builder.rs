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

//! Declarative builder over the low-level instruction set
//!
//! Generation logic reads as sequences of intent (`push`, `invoke`,
//! `if_null`) instead of raw instruction construction, and finished bodies
//! carry their computed stack requirement.

use colonist_core::code::{Instruction, LabelId, MethodBody, TryCatch};
use colonist_core::error::CoreResult;
use colonist_core::flags::Access;
use colonist_core::mirrors::MethodMirror;
use colonist_core::types::{CONSTRUCTOR_NAME, MethodDescriptor, TypeRef, well_known};

pub struct CodeBuilder {
    returns_value: bool,
    instructions: Vec<Instruction>,
    try_catches: Vec<TryCatch>,
    next_label: LabelId,
}

impl CodeBuilder {
    pub fn for_method(descriptor: &MethodDescriptor) -> Self {
        Self {
            returns_value: descriptor.signature.return_type.is_some(),
            instructions: Vec::new(),
            try_catches: Vec::new(),
            next_label: 0,
        }
    }

    pub fn fresh_label(&mut self) -> LabelId {
        let label = self.next_label;
        self.next_label += 1;
        label
    }

    pub fn mark(&mut self, label: LabelId) {
        self.instructions.push(Instruction::Label(label));
    }

    pub fn push_null(&mut self) {
        self.instructions.push(Instruction::PushNull);
    }

    pub fn push_type(&mut self, type_ref: TypeRef) {
        self.instructions.push(Instruction::PushType(type_ref));
    }

    pub fn push_string(&mut self, value: impl Into<String>) {
        self.instructions.push(Instruction::PushString(value.into()));
    }

    pub fn new_instance(&mut self, type_ref: TypeRef) {
        self.instructions.push(Instruction::New(type_ref));
    }

    pub fn dup(&mut self) {
        self.instructions.push(Instruction::Dup);
    }

    pub fn pop(&mut self) {
        self.instructions.push(Instruction::Pop);
    }

    pub fn swap(&mut self) {
        self.instructions.push(Instruction::Swap);
    }

    pub fn load_this(&mut self) {
        self.instructions.push(Instruction::LoadThis);
    }

    pub fn load_arg(&mut self, index: u16) {
        self.instructions.push(Instruction::LoadArg(index));
    }

    pub fn check_cast(&mut self, type_ref: TypeRef) {
        self.instructions.push(Instruction::CheckCast(type_ref));
    }

    pub fn get_static(&mut self, owner: TypeRef, field: impl Into<String>, field_type: TypeRef) {
        self.instructions.push(Instruction::GetStatic {
            owner,
            field: field.into(),
            field_type,
        });
    }

    pub fn invoke_static(&mut self, owner: TypeRef, method: MethodDescriptor) {
        self.instructions.push(Instruction::InvokeStatic { owner, method });
    }

    pub fn invoke_virtual(&mut self, owner: TypeRef, method: MethodDescriptor) {
        self.instructions.push(Instruction::InvokeVirtual { owner, method });
    }

    pub fn invoke_special(&mut self, owner: TypeRef, method: MethodDescriptor) {
        self.instructions.push(Instruction::InvokeSpecial { owner, method });
    }

    pub fn invoke_constructor(&mut self, owner: TypeRef, method: MethodDescriptor) {
        debug_assert!(method.is_constructor(), "not a constructor: {method}");
        self.instructions.push(Instruction::InvokeSpecial { owner, method });
    }

    /// Emits the return matching the method's signature
    pub fn return_value(&mut self) {
        if self.returns_value {
            self.instructions.push(Instruction::ReturnValue);
        } else {
            self.instructions.push(Instruction::Return);
        }
    }

    pub fn throw(&mut self) {
        self.instructions.push(Instruction::Throw);
    }

    /// Constructs and throws an exception with a string message
    pub fn throw_exception(&mut self, exception_type: TypeRef, message: &str) {
        self.new_instance(exception_type.clone());
        self.dup();
        self.push_string(message);
        self.invoke_constructor(
            exception_type,
            MethodDescriptor::new(CONSTRUCTOR_NAME, vec![well_known::string()], None),
        );
        self.throw();
    }

    /// Runs the block when the top of the stack is null
    pub fn if_null(&mut self, block: impl FnOnce(&mut Self)) {
        let end = self.fresh_label();
        self.instructions.push(Instruction::IfNonNull(end));
        block(self);
        self.mark(end);
    }

    /// Runs the block when the two topmost references are identical
    pub fn if_ref_eq(&mut self, block: impl FnOnce(&mut Self)) {
        let end = self.fresh_label();
        self.instructions.push(Instruction::IfRefNe(end));
        block(self);
        self.mark(end);
    }

    pub fn into_body(self) -> CoreResult<MethodBody> {
        MethodBody::compute(self.instructions, self.try_catches)
    }
}

/// Builds a method whose body is the block followed by an implicit return
pub fn new_method(access: Access, descriptor: &MethodDescriptor, block: impl FnOnce(&mut CodeBuilder)) -> CoreResult<MethodMirror> {
    let mut builder = CodeBuilder::for_method(descriptor);
    block(&mut builder);
    builder.return_value();
    finish_method(access, descriptor, builder)
}

/// Builds a method whose body is wrapped in a try/catch region. Both blocks
/// must end their own control flow.
pub fn new_method_try_catch(
    access: Access,
    descriptor: &MethodDescriptor,
    exception_type: TypeRef,
    try_block: impl FnOnce(&mut CodeBuilder),
    catch_block: impl FnOnce(&mut CodeBuilder),
) -> CoreResult<MethodMirror> {
    let mut builder = CodeBuilder::for_method(descriptor);
    let start = builder.fresh_label();
    let end = builder.fresh_label();
    let handler = builder.fresh_label();

    builder.mark(start);
    try_block(&mut builder);
    builder.mark(end);
    builder.mark(handler);
    catch_block(&mut builder);

    builder.try_catches.push(TryCatch {
        start,
        end,
        handler,
        exception_type,
    });
    finish_method(access, descriptor, builder)
}

fn finish_method(access: Access, descriptor: &MethodDescriptor, builder: CodeBuilder) -> CoreResult<MethodMirror> {
    let body = builder.into_body()?;
    Ok(MethodMirror::new(access, descriptor.name.clone(), descriptor.signature.clone()).with_body(body))
}
