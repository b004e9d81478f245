#![allow(dead_code)]

use std::collections::BTreeMap;

use mysql_operator::crd::{MySQL, MySQLSpec};
use mysql_operator::store::ObjectKey;

// DNS-1123 safe numeric suffix for unique names
pub const DIGITS: [char; 10] =
    ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
pub fn uniq(prefix: &str) -> String {
    format!("{prefix}-{}", nanoid::nanoid!(6, &DIGITS))
}

pub const NS: &str = "default";

pub fn key(name: &str) -> ObjectKey {
    ObjectKey::new(NS, name)
}

pub fn default_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), name.to_string())])
}

pub fn spec(image: &str, replicas: i32) -> MySQLSpec {
    MySQLSpec {
        instance_name: "orders".into(),
        ip: "10.0.0.5".into(),
        port: 3306,
        image: image.into(),
        replicas,
    }
}

/// MySQL as the API server would hand it out: namespaced, labelled, with a uid.
pub fn mysql(name: &str, image: &str, replicas: i32) -> MySQL {
    let mut obj = MySQL::new(name, spec(image, replicas));
    obj.metadata.namespace = Some(NS.into());
    obj.metadata.labels = Some(default_labels(name));
    obj.metadata.uid = Some(format!("uid-{name}"));
    obj
}
