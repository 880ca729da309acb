use jloader::class_file::ClassFile;

use crate::descriptor::parse_method_descriptor;
use crate::errors::{VmError, VmErrorKind};
use crate::host::PrintSink;
use crate::interpreter::{self, Outcome};
use crate::registry::ClassRegistry;

/// Top-level orchestrator: loads a single class, initializes it, and runs
/// its `main(String[])` method to completion. A thin `VirtualMachine` entry
/// point covering the actual load-initialize-invoke sequence this VM
/// performs.
pub struct VirtualMachine {
    registry: ClassRegistry,
}

impl VirtualMachine {
    pub fn new() -> Self {
        Self {
            registry: ClassRegistry::new(),
        }
    }

    /// Loads `bytes` as a class file, runs `<clinit>` if present, then
    /// invokes its `main([Ljava/lang/String;)V`. Returns once `main`
    /// returns; any failure along the way is fatal.
    pub fn run_main(&mut self, bytes: &[u8], sink: &mut dyn PrintSink) -> Result<(), VmError> {
        let class_file = ClassFile::from_bytes(bytes)?;
        let class_name = class_file.this_class_name()?;

        self.registry.initialize(&class_name, class_file, sink)?;

        let main_descriptor = "([Ljava/lang/String;)V";
        let main = self
            .registry
            .get(&class_name)
            .and_then(|c| c.class_file.find_method("main", main_descriptor))
            .ok_or_else(|| {
                VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                    "{class_name}.main{main_descriptor} not found"
                )))
            })?;

        if !main.is_static() {
            return Err(VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "{class_name}.main{main_descriptor} must be static"
            ))));
        }

        let code = main.code().cloned().ok_or_else(|| {
            VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "{class_name}.main{main_descriptor} has no Code attribute"
            )))
        })?;

        let (arg_types, _return_type) = parse_method_descriptor(main_descriptor)?;
        let args = arg_types
            .iter()
            .map(|ty| crate::operand::Operand::default_for(*ty))
            .collect();

        match interpreter::run(&mut self.registry, &class_name, "main", &code, args, sink)? {
            Outcome::Returned(_) => Ok(()),
        }
    }
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}
