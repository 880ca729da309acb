use jloader::class_file::ClassFile;

use jvm_rs::errors::VmErrorKind;
use jvm_rs::host::RecordingSink;
use jvm_rs::registry::ClassRegistry;
use jvm_rs::vm::VirtualMachine;

/// Hand-assembles minimal `.class` file bytes the way
/// `jloader/tests/loading.rs`'s fixture builder does, generalized from one
/// fixed layout into a small constant-pool/method builder so each scenario
/// below only has to describe the bytecode it actually exercises.
struct ClassBuilder {
    pool: Vec<u8>,
    count: u16,
    fields: Vec<(u16, u16, u16)>,
    methods: Vec<MethodFixture>,
    this_class: u16,
    super_class: u16,
}

struct MethodFixture {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    max_stack: u16,
    max_locals: u16,
    code: Vec<u8>,
}

const ACC_PUBLIC_STATIC: u16 = 0x0009;
const ACC_STATIC_FIELD: u16 = 0x0008;

impl ClassBuilder {
    fn new(this_name: &str) -> Self {
        let mut b = ClassBuilder {
            pool: Vec::new(),
            count: 0,
            fields: Vec::new(),
            methods: Vec::new(),
            this_class: 0,
            super_class: 0,
        };
        let this_name_idx = b.utf8(this_name);
        b.this_class = b.class_ref_raw(this_name_idx);
        let super_name_idx = b.utf8("java/lang/Object");
        b.super_class = b.class_ref_raw(super_name_idx);
        b
    }

    fn next_index(&mut self) -> u16 {
        self.count += 1;
        self.count
    }

    fn utf8(&mut self, s: &str) -> u16 {
        self.pool.push(1);
        self.pool.extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.pool.extend_from_slice(s.as_bytes());
        self.next_index()
    }

    fn class_ref_raw(&mut self, name_index: u16) -> u16 {
        self.pool.push(7);
        self.pool.extend_from_slice(&name_index.to_be_bytes());
        self.next_index()
    }

    fn class_ref(&mut self, name: &str) -> u16 {
        let name_idx = self.utf8(name);
        self.class_ref_raw(name_idx)
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_idx = self.utf8(name);
        let desc_idx = self.utf8(descriptor);
        self.pool.push(12);
        self.pool.extend_from_slice(&name_idx.to_be_bytes());
        self.pool.extend_from_slice(&desc_idx.to_be_bytes());
        self.next_index()
    }

    fn fieldref(&mut self, class_idx: u16, nat_idx: u16) -> u16 {
        self.pool.push(9);
        self.pool.extend_from_slice(&class_idx.to_be_bytes());
        self.pool.extend_from_slice(&nat_idx.to_be_bytes());
        self.next_index()
    }

    fn methodref(&mut self, class_idx: u16, nat_idx: u16) -> u16 {
        self.pool.push(10);
        self.pool.extend_from_slice(&class_idx.to_be_bytes());
        self.pool.extend_from_slice(&nat_idx.to_be_bytes());
        self.next_index()
    }

    fn string(&mut self, s: &str) -> u16 {
        let utf8_idx = self.utf8(s);
        self.pool.push(8);
        self.pool.extend_from_slice(&utf8_idx.to_be_bytes());
        self.next_index()
    }

    fn add_static_field(&mut self, name: &str, descriptor: &str) {
        let name_idx = self.utf8(name);
        let desc_idx = self.utf8(descriptor);
        self.fields.push((ACC_STATIC_FIELD, name_idx, desc_idx));
    }

    fn add_method(&mut self, access_flags: u16, name: &str, descriptor: &str, max_stack: u16, max_locals: u16, code: Vec<u8>) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.methods.push(MethodFixture {
            access_flags,
            name_index,
            descriptor_index,
            max_stack,
            max_locals,
            code,
        });
    }

    fn build(mut self) -> Vec<u8> {
        let code_name_idx = self.utf8("Code");

        let mut b = Vec::new();
        b.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        b.extend_from_slice(&0u16.to_be_bytes());
        b.extend_from_slice(&52u16.to_be_bytes());
        b.extend_from_slice(&(self.count + 1).to_be_bytes());
        b.extend_from_slice(&self.pool);
        b.extend_from_slice(&0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
        b.extend_from_slice(&self.this_class.to_be_bytes());
        b.extend_from_slice(&self.super_class.to_be_bytes());
        b.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count

        b.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for (flags, name_idx, desc_idx) in &self.fields {
            b.extend_from_slice(&flags.to_be_bytes());
            b.extend_from_slice(&name_idx.to_be_bytes());
            b.extend_from_slice(&desc_idx.to_be_bytes());
            b.extend_from_slice(&0u16.to_be_bytes());
        }

        b.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for m in &self.methods {
            b.extend_from_slice(&m.access_flags.to_be_bytes());
            b.extend_from_slice(&m.name_index.to_be_bytes());
            b.extend_from_slice(&m.descriptor_index.to_be_bytes());
            b.extend_from_slice(&1u16.to_be_bytes()); // attributes_count
            b.extend_from_slice(&code_name_idx.to_be_bytes());

            let mut body = Vec::new();
            body.extend_from_slice(&m.max_stack.to_be_bytes());
            body.extend_from_slice(&m.max_locals.to_be_bytes());
            body.extend_from_slice(&(m.code.len() as u32).to_be_bytes());
            body.extend_from_slice(&m.code);
            body.extend_from_slice(&0u16.to_be_bytes()); // exception_table_length
            body.extend_from_slice(&0u16.to_be_bytes()); // nested attributes_count

            b.extend_from_slice(&(body.len() as u32).to_be_bytes());
            b.extend_from_slice(&body);
        }

        b.extend_from_slice(&0u16.to_be_bytes()); // class attributes_count
        b
    }
}

/// A class with a `System.out` field reference and a `println` methodref
/// for the given argument descriptor, wired up once so every scenario
/// below just asks for the indices it needs.
struct PrintlnFixture {
    builder: ClassBuilder,
    out_field: u16,
    println_int: u16,
    println_float: u16,
    println_string: u16,
}

impl PrintlnFixture {
    fn new(class_name: &str) -> Self {
        let mut builder = ClassBuilder::new(class_name);
        let system_class = builder.class_ref("java/lang/System");
        let out_nat = builder.name_and_type("out", "Ljava/io/PrintStream;");
        let out_field = builder.fieldref(system_class, out_nat);
        let print_stream = builder.class_ref("java/io/PrintStream");
        let int_nat = builder.name_and_type("println", "(I)V");
        let println_int = builder.methodref(print_stream, int_nat);
        let float_nat = builder.name_and_type("println", "(F)V");
        let println_float = builder.methodref(print_stream, float_nat);
        let string_nat = builder.name_and_type("println", "(Ljava/lang/String;)V");
        let println_string = builder.methodref(print_stream, string_nat);
        Self {
            builder,
            out_field,
            println_int,
            println_float,
            println_string,
        }
    }
}

fn u2(v: u16) -> [u8; 2] {
    v.to_be_bytes()
}

#[test]
fn hello_world_prints_expected_line() {
    let mut fx = PrintlnFixture::new("Main");
    let message = fx.builder.string("Hello, World!");

    let mut code = Vec::new();
    code.push(0xb2);
    code.extend_from_slice(&u2(fx.out_field)); // getstatic System.out
    code.push(0x12);
    code.push(message as u8); // ldc "Hello, World!"
    code.push(0xb6);
    code.extend_from_slice(&u2(fx.println_string)); // invokevirtual println(String)
    code.push(0xb1); // return

    fx.builder
        .add_method(ACC_PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", 2, 1, code);

    let bytes = fx.builder.build();
    let mut vm = VirtualMachine::new();
    let mut sink = RecordingSink::default();
    vm.run_main(&bytes, &mut sink).expect("interpretation should succeed");
    assert_eq!(sink.buffer, "Hello, World!\n");
}

#[test]
fn arithmetic_prints_int_and_float_results() {
    let mut fx = PrintlnFixture::new("Main");

    let mut code = Vec::new();
    // println(2 + 3 * 4)
    code.push(0xb2);
    code.extend_from_slice(&u2(fx.out_field));
    code.push(0x05); // iconst_2
    code.push(0x06); // iconst_3
    code.push(0x07); // iconst_4
    code.push(0x68); // imul
    code.push(0x60); // iadd
    code.push(0xb6);
    code.extend_from_slice(&u2(fx.println_int));

    // println((float) 1 / (float) 4)
    code.push(0xb2);
    code.extend_from_slice(&u2(fx.out_field));
    code.push(0x04); // iconst_1
    code.push(0x86); // i2f
    code.push(0x07); // iconst_4
    code.push(0x86); // i2f
    code.push(0x6e); // fdiv
    code.push(0xb6);
    code.extend_from_slice(&u2(fx.println_float));
    code.push(0xb1); // return

    fx.builder
        .add_method(ACC_PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", 4, 1, code);

    let bytes = fx.builder.build();
    let mut vm = VirtualMachine::new();
    let mut sink = RecordingSink::default();
    vm.run_main(&bytes, &mut sink).expect("interpretation should succeed");
    assert_eq!(sink.buffer, "14\n0.25\n");
}

#[test]
fn loop_sum_accumulates_zero_through_nine() {
    let mut fx = PrintlnFixture::new("Main");

    let mut code = Vec::new();
    code.push(0x03); // iconst_0
    code.push(0x3c); // istore_1 (i = 0)
    code.push(0x03); // iconst_0
    code.push(0x3d); // istore_2 (s = 0)
    // loop_start @ 4
    code.push(0x1b); // iload_1
    code.push(0x10);
    code.push(10); // bipush 10
    code.push(0xa2);
    code.push(0x00);
    code.push(0x0d); // if_icmpge +13 -> end @ 20
    code.push(0x1c); // iload_2
    code.push(0x1b); // iload_1
    code.push(0x60); // iadd
    code.push(0x3d); // istore_2
    code.push(0x84);
    code.push(0x01);
    code.push(0x01); // iinc 1, 1
    code.push(0xa7);
    code.push(0xff);
    code.push(0xf3); // goto -13 -> loop_start @ 4
    // end @ 20
    code.push(0xb2);
    code.extend_from_slice(&u2(fx.out_field));
    code.push(0x1c); // iload_2
    code.push(0xb6);
    code.extend_from_slice(&u2(fx.println_int));
    code.push(0xb1);

    assert_eq!(code.len(), 28);

    fx.builder
        .add_method(ACC_PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", 2, 3, code);

    let bytes = fx.builder.build();
    let mut vm = VirtualMachine::new();
    let mut sink = RecordingSink::default();
    vm.run_main(&bytes, &mut sink).expect("interpretation should succeed");
    assert_eq!(sink.buffer, "45\n");
}

#[test]
fn array_echo_sums_three_stored_elements() {
    let mut fx = PrintlnFixture::new("Main");

    let mut code = Vec::new();
    code.push(0x08); // iconst_3
    code.push(0xbc);
    code.push(10); // newarray T_INT
    code.push(0x4c); // astore_1
    code.push(0x2a); // aload_1
    code.push(0x03); // iconst_0
    code.push(0x10);
    code.push(7); // bipush 7
    code.push(0x4f); // iastore
    code.push(0x2a); // aload_1
    code.push(0x04); // iconst_1
    code.push(0x10);
    code.push(8); // bipush 8
    code.push(0x4f); // iastore
    code.push(0x2a); // aload_1
    code.push(0x05); // iconst_2
    code.push(0x10);
    code.push(9); // bipush 9
    code.push(0x4f); // iastore
    code.push(0xb2);
    code.extend_from_slice(&u2(fx.out_field));
    code.push(0x2a); // aload_1
    code.push(0x03); // iconst_0
    code.push(0x2e); // iaload
    code.push(0x2a); // aload_1
    code.push(0x04); // iconst_1
    code.push(0x2e); // iaload
    code.push(0x60); // iadd
    code.push(0x2a); // aload_1
    code.push(0x05); // iconst_2
    code.push(0x2e); // iaload
    code.push(0x60); // iadd
    code.push(0xb6);
    code.extend_from_slice(&u2(fx.println_int));
    code.push(0xb1);

    fx.builder
        .add_method(ACC_PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", 4, 2, code);

    let bytes = fx.builder.build();
    let mut vm = VirtualMachine::new();
    let mut sink = RecordingSink::default();
    vm.run_main(&bytes, &mut sink).expect("interpretation should succeed");
    assert_eq!(sink.buffer, "24\n");
}

#[test]
fn static_init_prints_field_value() {
    let mut fx = PrintlnFixture::new("Main");
    fx.builder.add_static_field("N", "I");
    let n_nat = fx.builder.name_and_type("N", "I");
    let n_field = fx.builder.fieldref(fx.builder.this_class, n_nat);

    let mut clinit_code = Vec::new();
    clinit_code.push(0x10);
    clinit_code.push(42); // bipush 42
    clinit_code.push(0xb3);
    clinit_code.extend_from_slice(&u2(n_field)); // putstatic N
    clinit_code.push(0xb1);
    fx.builder.add_method(0x0008, "<clinit>", "()V", 1, 0, clinit_code);

    let mut main_code = Vec::new();
    main_code.push(0xb2);
    main_code.extend_from_slice(&u2(fx.out_field));
    main_code.push(0xb2);
    main_code.extend_from_slice(&u2(n_field));
    main_code.push(0xb6);
    main_code.extend_from_slice(&u2(fx.println_int));
    main_code.push(0xb1);
    fx.builder
        .add_method(ACC_PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", 2, 1, main_code);

    let bytes = fx.builder.build();
    let mut vm = VirtualMachine::new();
    let mut sink = RecordingSink::default();
    vm.run_main(&bytes, &mut sink).expect("interpretation should succeed");
    assert_eq!(sink.buffer, "42\n");
}

#[test]
fn clinit_runs_exactly_once_even_if_initialize_is_called_twice() {
    let mut builder = ClassBuilder::new("Counter");
    builder.add_static_field("value", "I");
    let nat = builder.name_and_type("value", "I");
    let field = builder.fieldref(builder.this_class, nat);

    let mut clinit_code = Vec::new();
    clinit_code.push(0xb2);
    clinit_code.extend_from_slice(&u2(field)); // getstatic value (default 0)
    clinit_code.push(0x04); // iconst_1
    clinit_code.push(0x60); // iadd
    clinit_code.push(0xb3);
    clinit_code.extend_from_slice(&u2(field)); // putstatic value
    clinit_code.push(0xb1);
    builder.add_method(0x0008, "<clinit>", "()V", 2, 0, clinit_code);

    let bytes = builder.build();
    let class_file = ClassFile::from_bytes(&bytes).expect("class should parse");

    let mut registry = ClassRegistry::new();
    let mut sink = RecordingSink::default();
    registry
        .initialize("Counter", class_file.clone(), &mut sink)
        .expect("first initialize should run <clinit>");
    registry
        .initialize("Counter", class_file, &mut sink)
        .expect("second initialize should be a no-op");

    let value = registry.get_static("Counter", "value").unwrap();
    assert_eq!(value.as_int(), Some(1));
}

#[test]
fn bad_magic_is_reported_as_malformed_class_file() {
    let mut builder = ClassBuilder::new("Main");
    builder.add_method(ACC_PUBLIC_STATIC, "main", "([Ljava/lang/String;)V", 1, 1, vec![0xb1]);
    let mut bytes = builder.build();
    bytes[0] = 0x00;

    let mut vm = VirtualMachine::new();
    let mut sink = RecordingSink::default();
    let err = vm.run_main(&bytes, &mut sink).unwrap_err();
    assert!(matches!(err.kind, VmErrorKind::MalformedClassFile(_)));
}
