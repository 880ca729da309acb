use jloader::class_file::ClassFile;
use jloader::errors::LoadCause;

/// Hand-assembles the bytes of a minimal valid class file:
///
/// ```java
/// public class Main extends Object {
///     public static void main(String[] args) { return; }
/// }
/// ```
///
/// No compiler is available in this environment, so the fixture is built
/// byte-by-byte against the layout in JVMS §4.1 rather than loaded from disk.
fn minimal_class_bytes() -> Vec<u8> {
    let mut b = Vec::new();

    b.extend_from_slice(&0xCAFEBABEu32.to_be_bytes()); // magic
    b.extend_from_slice(&0u16.to_be_bytes()); // minor_version
    b.extend_from_slice(&52u16.to_be_bytes()); // major_version

    // constant_pool_count = 8 (7 real entries, 1-indexed)
    b.extend_from_slice(&8u16.to_be_bytes());

    // #1 Utf8 "Code"
    push_utf8(&mut b, "Code");
    // #2 Utf8 "Main"
    push_utf8(&mut b, "Main");
    // #3 Class { name_index: 2 }
    b.push(7);
    b.extend_from_slice(&2u16.to_be_bytes());
    // #4 Utf8 "java/lang/Object"
    push_utf8(&mut b, "java/lang/Object");
    // #5 Class { name_index: 4 }
    b.push(7);
    b.extend_from_slice(&4u16.to_be_bytes());
    // #6 Utf8 "main"
    push_utf8(&mut b, "main");
    // #7 Utf8 "([Ljava/lang/String;)V"
    push_utf8(&mut b, "([Ljava/lang/String;)V");

    b.extend_from_slice(&0x0021u16.to_be_bytes()); // access_flags: PUBLIC | SUPER
    b.extend_from_slice(&3u16.to_be_bytes()); // this_class
    b.extend_from_slice(&5u16.to_be_bytes()); // super_class

    b.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count
    b.extend_from_slice(&0u16.to_be_bytes()); // fields_count

    b.extend_from_slice(&1u16.to_be_bytes()); // methods_count
    b.extend_from_slice(&0x0009u16.to_be_bytes()); // access_flags: PUBLIC | STATIC
    b.extend_from_slice(&6u16.to_be_bytes()); // name_index -> "main"
    b.extend_from_slice(&7u16.to_be_bytes()); // descriptor_index
    b.extend_from_slice(&1u16.to_be_bytes()); // attributes_count

    // Code attribute
    b.extend_from_slice(&1u16.to_be_bytes()); // attribute_name_index -> "Code"
    let code_body = code_attribute_body(&[0xB1]); // return
    b.extend_from_slice(&(code_body.len() as u32).to_be_bytes());
    b.extend_from_slice(&code_body);

    b.extend_from_slice(&0u16.to_be_bytes()); // class attributes_count

    b
}

fn push_utf8(b: &mut Vec<u8>, s: &str) {
    b.push(1);
    b.extend_from_slice(&(s.len() as u16).to_be_bytes());
    b.extend_from_slice(s.as_bytes());
}

fn code_attribute_body(code: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes()); // max_stack
    body.extend_from_slice(&1u16.to_be_bytes()); // max_locals
    body.extend_from_slice(&(code.len() as u32).to_be_bytes());
    body.extend_from_slice(code);
    body.extend_from_slice(&0u16.to_be_bytes()); // exception_table_length
    body.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
    body
}

#[test]
fn loads_minimal_class_and_resolves_main() {
    let bytes = minimal_class_bytes();
    let class = ClassFile::from_bytes(&bytes).expect("class should parse");

    assert_eq!(class.this_class_name().unwrap(), "Main");
    assert_eq!(class.access_flag_names(), vec!["ACC_PUBLIC", "ACC_SUPER"]);

    let main = class
        .find_method("main", "([Ljava/lang/String;)V")
        .expect("main method should be indexed by name+descriptor");
    assert!(main.is_static());
    assert_eq!(main.code().unwrap().code, vec![0xB1]);
}

#[test]
fn bad_magic_is_reported_as_malformed() {
    let mut bytes = minimal_class_bytes();
    bytes[0] = 0x00;
    let err = ClassFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err.cause, LoadCause::InvalidMagic(_)));
}

#[test]
fn trailing_bytes_after_class_are_rejected() {
    let mut bytes = minimal_class_bytes();
    bytes.push(0xFF);
    let err = ClassFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err.cause, LoadCause::TrailingBytes(1)));
}
