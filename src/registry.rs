use std::collections::HashMap;

use jloader::class_file::ClassFile;

use crate::descriptor::parse_field_descriptor;
use crate::errors::{Diagnostic, VmError, VmErrorKind};
use crate::host::PrintSink;
use crate::interpreter::{self, Outcome};
use crate::operand::Operand;

/// A loaded class paired with its static-field storage (§3 `RuntimeClass`).
/// Created at first use by [`ClassRegistry::initialize`]; never evicted
/// during a run.
pub struct RuntimeClass {
    pub class_file: ClassFile,
    pub static_fields: HashMap<String, Operand>,
    clinit_ran: bool,
}

/// Loaded classes keyed by internal name (§4.F). The registry owns every
/// `RuntimeClass` for the lifetime of a single interpreted run; there is no
/// unloading.
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, RuntimeClass>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, internal_name: &str) -> Option<&RuntimeClass> {
        self.classes.get(internal_name)
    }

    pub fn is_loaded(&self, internal_name: &str) -> bool {
        self.classes.contains_key(internal_name)
    }

    /// Registers `class_file` under `internal_name` if not already present,
    /// default-initializes its static fields, and runs `<clinit>` at most
    /// once (§4.F, testable property 6). A no-op if the class is already
    /// registered.
    pub fn initialize(
        &mut self,
        internal_name: &str,
        class_file: ClassFile,
        sink: &mut dyn PrintSink,
    ) -> Result<(), VmError> {
        if self.classes.contains_key(internal_name) {
            return Ok(());
        }

        log::debug!("initializing class {internal_name}");

        let mut static_fields = HashMap::new();
        for field in &class_file.fields {
            use jloader::access_flags::FieldAccessFlag;
            if field.access_flags & (FieldAccessFlag::Static as u16) == 0 {
                continue;
            }
            let name = class_file.name_of(field.name_index)?;
            let descriptor = class_file.name_of(field.descriptor_index)?;
            let ty = parse_field_descriptor(&descriptor)?;
            static_fields.insert(name, Operand::default_for(ty));
        }

        self.classes.insert(
            internal_name.to_owned(),
            RuntimeClass {
                class_file,
                static_fields,
                clinit_ran: false,
            },
        );

        self.run_clinit(internal_name, sink)
    }

    fn run_clinit(&mut self, internal_name: &str, sink: &mut dyn PrintSink) -> Result<(), VmError> {
        let already_ran = self
            .classes
            .get(internal_name)
            .map(|c| c.clinit_ran)
            .unwrap_or(true);
        if already_ran {
            return Ok(());
        }

        let clinit_code = self
            .classes
            .get(internal_name)
            .and_then(|c| c.class_file.find_method("<clinit>", "()V"))
            .and_then(|m| m.code())
            .cloned();

        if let Some(code) = clinit_code {
            log::trace!("running <clinit> for {internal_name}");
            let outcome = interpreter::run(self, internal_name, "<clinit>", &code, Vec::new(), sink)?;
            if let Outcome::Returned(Some(_)) = outcome {
                return Err(VmError::new(
                    VmErrorKind::ClassInitFailure(format!(
                        "<clinit> of {internal_name} returned a value; ()V must return void"
                    )),
                    Diagnostic::default(),
                ));
            }
        }

        if let Some(class) = self.classes.get_mut(internal_name) {
            class.clinit_ran = true;
        }
        Ok(())
    }

    pub fn get_static(&self, internal_name: &str, field_name: &str) -> Result<Operand, VmError> {
        self.classes
            .get(internal_name)
            .and_then(|c| c.static_fields.get(field_name))
            .cloned()
            .ok_or_else(|| {
                VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                    "static field {internal_name}.{field_name}"
                )))
            })
    }

    pub fn put_static(
        &mut self,
        internal_name: &str,
        field_name: &str,
        value: Operand,
    ) -> Result<(), VmError> {
        let class = self.classes.get_mut(internal_name).ok_or_else(|| {
            VmError::without_diagnostic(VmErrorKind::UnresolvedSymbol(format!(
                "class {internal_name} is not initialized"
            )))
        })?;
        class.static_fields.insert(field_name.to_owned(), value);
        Ok(())
    }
}
