use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq,
)]
#[kube(
    group = "database.fordba.com",
    version = "v1",
    kind = "MySQL",
    plural = "mysqls",
    shortname = "mysql",
    namespaced,
    status = "MySQLStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".spec.image"}"#,
    printcolumn = r#"{"name":"Replicas","type":"integer","jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MySQLSpec {
    /// Logical database instance name
    pub instance_name: String,
    /// Address the instance is expected to be reachable on
    pub ip: String,
    pub port: i32,
    /// Container image reference used for the database container
    pub image: String,
    /// Desired replica count, passed to the workload as-is (no clamping)
    pub replicas: i32,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
pub struct MySQLStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl MySQL {
    /// Current status marker, if any has been written yet.
    pub fn status_marker(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.status.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;
    use serde_json::json;

    #[test]
    fn spec_uses_camel_case_field_names() {
        let spec = MySQLSpec {
            instance_name: "db1".into(),
            ip: "10.0.0.5".into(),
            port: 3306,
            image: "mysql:8".into(),
            replicas: 3,
        };
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            v,
            json!({
                "instanceName": "db1",
                "ip": "10.0.0.5",
                "port": 3306,
                "image": "mysql:8",
                "replicas": 3
            })
        );
    }

    #[test]
    fn empty_status_serializes_without_marker() {
        let v = serde_json::to_value(MySQLStatus::default()).unwrap();
        assert_eq!(v, json!({}));
    }

    #[test]
    fn crd_declares_status_subresource() {
        let crd = MySQL::crd();
        assert_eq!(crd.spec.group, "database.fordba.com");
        assert_eq!(crd.spec.names.kind, "MySQL");
        let version = &crd.spec.versions[0];
        assert_eq!(version.name, "v1");
        assert!(
            version
                .subresources
                .as_ref()
                .and_then(|s| s.status.as_ref())
                .is_some()
        );
    }

    #[test]
    fn status_marker_reads_nested_value() {
        let mut obj = MySQL::new(
            "db1",
            MySQLSpec {
                instance_name: "db1".into(),
                ip: "10.0.0.5".into(),
                port: 3306,
                image: "mysql:8".into(),
                replicas: 1,
            },
        );
        assert_eq!(obj.status_marker(), None);
        obj.status = Some(MySQLStatus {
            status: Some("Running".into()),
        });
        assert_eq!(obj.status_marker(), Some("Running"));
    }
}
