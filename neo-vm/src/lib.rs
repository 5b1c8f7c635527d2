//! # Neo VM scripts
//!
//! Building and reading Neo N3 VM bytecode without executing it:
//!
//! - [`OpCode`]: the instruction set with operand layouts and prices
//! - [`ScriptBuilder`]: emits pushes, syscalls and contract calls using the
//!   smallest encoding for every constant
//! - [`script_reader`]: reads pushed values back out of a script
//! - [`Script`] / [`Instruction`]: shape validation and disassembly
//!
//! ## Example
//!
//! ```rust
//! use neo_io::MemoryReader;
//! use neo_vm::{script_reader, ScriptBuilder};
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(5).emit_push_string("neo");
//! let script = builder.into_bytes();
//!
//! let mut reader = MemoryReader::new(&script);
//! assert_eq!(script_reader::read_push_integer(&mut reader).unwrap(), num_bigint::BigInt::from(5));
//! assert_eq!(script_reader::read_push_string(&mut reader).unwrap(), "neo");
//! ```

pub mod call_flags;
pub mod contract_parameter;
pub mod error;
pub mod instruction;
pub mod op_code;
pub mod script;
pub mod script_builder;
pub mod script_reader;

pub use call_flags::CallFlags;
pub use contract_parameter::ContractParameter;
pub use error::{VmError, VmResult};
pub use instruction::Instruction;
pub use op_code::{OpCode, OpCodeInfo, OperandSize};
pub use script::Script;
pub use script_builder::{ScriptBuilder, CONTRACT_CALL_SYSCALL};
