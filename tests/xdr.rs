use std::fmt::Debug;

use loopmount::xdr::nfs3::nfsstring;
use loopmount::xdr::{deserialize, Deserialize, Serialize};

#[derive(Default)]
struct Context {
    buf: Vec<u8>,
}

trait TestValue: Deserialize + Serialize + Eq + Default + Debug + Clone {}
impl<T: Deserialize + Serialize + Eq + Default + Debug + Clone> TestValue for T {}

impl Context {
    /// Serializes `src_value` into buffers of varying capacity and
    /// pre-existing content, then checks four-byte alignment and that
    /// deserialization reproduces the value.
    fn check<T: TestValue>(&mut self, src_value: &T) {
        for capacity in 0..32 {
            for existing in 0..capacity {
                self.buf = Vec::with_capacity(capacity);
                self.buf.resize(existing, Default::default());

                src_value.serialize(&mut self.buf).expect("cannot serialize");
                assert_eq!((self.buf.len() - existing) % 4, 0);

                let result_value =
                    deserialize::<T>(&mut &self.buf[existing..]).expect("cannot deserialize");

                assert_eq!(src_value, &result_value);
            }
        }
    }

    fn check_multi<T: TestValue>(&mut self, src_values: &[T]) {
        src_values.iter().for_each(|i| self.check(i));
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone)]
struct TestForVecU8(Vec<u8>);

impl Serialize for TestForVecU8 {
    fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for TestForVecU8 {
    fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone)]
struct TestForVecU32(Vec<u32>);

impl Serialize for TestForVecU32 {
    fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for TestForVecU32 {
    fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

#[test]
fn test_scalar_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[true, false]);

    ctx.check_multi(&[i32::MIN, -1i32, 0i32, 1i32, i32::MAX]);
    ctx.check_multi(&[i64::MIN, -1i64, 0i64, 1i64, i64::MAX]);

    ctx.check_multi(&[u32::MIN, 1u32, 2u32, u32::MAX]);
    ctx.check_multi(&[u64::MIN, 1u64, 2u64, u64::MAX]);
}

#[test]
fn test_opaque_bijection() {
    let mut ctx = Context::default();

    ctx.check(&[1u8]);
    ctx.check(&[1u8, 2u8, 3u8]);
    ctx.check(&[1u8, 2u8, 3u8, 4u8, 5u8, 6u8]);

    ctx.check_multi(&[
        TestForVecU8(vec![]),
        TestForVecU8(vec![1u8]),
        TestForVecU8(vec![1u8, 2u8, 3u8]),
        TestForVecU8(vec![1u8, 2u8, 3u8, 4u8]),
    ]);
}

#[test]
fn test_array_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[
        TestForVecU32(vec![]),
        TestForVecU32(vec![1]),
        TestForVecU32(vec![1, 2, 3]),
        TestForVecU32(vec![1, 2, 3, 4]),
    ]);
}

#[test]
fn test_nfsstring_bijection() {
    let mut ctx = Context::default();

    ctx.check_multi(&[
        nfsstring::from(""),
        nfsstring::from("abc"),
        nfsstring::from("abc1234+-"),
        nfsstring::from("report.txt"),
    ]);
}

#[test]
fn variable_length_opaque_is_length_prefixed_and_padded() {
    let mut buf = Vec::new();
    b"abcde".as_slice().serialize(&mut buf).expect("serialize");
    assert_eq!(buf, [0, 0, 0, 5, b'a', b'b', b'c', b'd', b'e', 0, 0, 0]);
}
