#[cfg(test)]
pub mod test {
    use serde::{Deserialize, Serialize};

    use crate::Duration;

    /// One field of every supported leaf kind, two levels deep.
    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct TestConfig {
        pub foo: Foo,
        pub bar: isize,
        pub baz: Baz,
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Foo {
        pub key1: bool,
        pub key2: isize,
        pub key2b: i8,
        pub key3a: i16,
        pub key3: i32,
        pub key4: i64,
        pub key5: usize,
        pub key5b: u8,
        pub key6a: u16,
        pub key6: u32,
        pub key7: u64,
        pub key8: f32,
        pub key9: f64,
        pub key10: String,
        pub key11: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Baz {
        pub quux: Quux,
        pub interval: Duration,
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Quux {
        pub key_a: String,
        pub key_b: bool,
    }

    /// A full document for [`TestConfig`], laid out exactly as the YAML writer
    /// emits it.
    pub const TEST_CONFIG_YAML: &str = "\
foo:
  key1: true
  key2: -10
  key2b: -128
  key3a: -32768
  key3: -11
  key4: -100000000000000
  key5: 10
  key5b: 255
  key6a: 65535
  key6: 11
  key7: 100000000000000
  key8: 1.5
  key9: 1.0000000000005
  key10: hello, world
  key11:
  - hello
  - world
bar: 12345
baz:
  quux:
    key_a: 'true'
    key_b: true
  interval: 10h9m8.007006005s
";

    /// Check every field against the values in [`TEST_CONFIG_YAML`].
    pub fn assert_test_config_values(c: &TestConfig) {
        assert!(c.foo.key1);
        assert_eq!(c.foo.key2, -10);
        assert_eq!(c.foo.key2b, -128);
        assert_eq!(c.foo.key3a, -32768);
        assert_eq!(c.foo.key3, -11);
        assert_eq!(c.foo.key4, -100000000000000);
        assert_eq!(c.foo.key5, 10);
        assert_eq!(c.foo.key5b, 255);
        assert_eq!(c.foo.key6a, 65535);
        assert_eq!(c.foo.key6, 11);
        assert_eq!(c.foo.key7, 100000000000000);
        assert_eq!(c.foo.key8, 1.5);
        assert_eq!(c.foo.key9, 1.0000000000005);
        assert_eq!(c.foo.key10, "hello, world");
        assert_eq!(c.foo.key11, vec!["hello", "world"]);
        assert_eq!(c.bar, 12345);
        assert_eq!(c.baz.quux.key_a, "true");
        assert!(c.baz.quux.key_b);
        assert_eq!(
            c.baz.interval,
            10 * Duration::HOUR
                + 9 * Duration::MINUTE
                + 8 * Duration::SECOND
                + 7 * Duration::MILLISECOND
                + 6 * Duration::MICROSECOND
                + 5 * Duration::NANOSECOND
        );
    }

    #[test]
    fn fixture_document_matches_values() {
        let c: TestConfig = serde_yaml::from_str(TEST_CONFIG_YAML).unwrap();
        assert_test_config_values(&c);
    }

    // -- Fixture for embedding, optional sections and unsupported kinds --------

    #[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Mode {
        #[default]
        Fast,
        Slow,
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct LayeredConfig {
        pub name: String,
        #[serde(flatten)]
        pub common: Common,
        pub server: Server,
        pub tls: Option<Tls>,
        pub mode: Mode,
        pub ports: Vec<u16>,
        pub tags: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Common {
        pub verbose: bool,
        pub retries: u32,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    #[serde(default)]
    pub struct Server {
        #[serde(deserialize_with = "non_empty")]
        pub host: String,
        pub port: u16,
        pub timeout: Duration,
    }

    impl Default for Server {
        fn default() -> Self {
            Server {
                host: "localhost".into(),
                port: 8080,
                timeout: Duration::from_secs(30),
            }
        }
    }

    #[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Tls {
        pub cert: String,
        pub verify: bool,
    }

    /// Reject empty strings at deserialization time.
    fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(serde::de::Error::custom("must not be empty"));
        }
        Ok(s)
    }

    pub fn layered_config() -> LayeredConfig {
        LayeredConfig {
            name: "svc".into(),
            common: Common {
                verbose: false,
                retries: 3,
            },
            server: Server::default(),
            tls: None,
            mode: Mode::Fast,
            ports: vec![80, 443],
            tags: vec!["a".into(), "b c".into()],
        }
    }

    #[test]
    fn layered_config_survives_yaml() {
        let c = layered_config();
        let tree = serde_yaml::to_value(&c).unwrap();
        let back: LayeredConfig = serde_yaml::from_value(tree).unwrap();
        assert_eq!(back, c);
    }
}
