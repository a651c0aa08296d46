use serde::{Deserialize, Serialize};

use crate::config::cluster::Labels;
use crate::impl_to_value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kubernetes {
    pub version: Option<String>,
    pub kubespray: Option<Kubespray>,
    pub dns_mode: Option<String>,
    pub network_plugin: Option<String>,
    pub other: Other,
}

impl_to_value!(Kubernetes {
    version => { yaml = "version" },
    kubespray => { yaml = "kubespray" },
    dns_mode => { yaml = "dnsMode" },
    network_plugin => { yaml = "networkPlugin" },
    other => { yaml = "other" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kubespray {
    pub version: Option<String>,
}

impl_to_value!(Kubespray {
    version => { yaml = "version" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Other {
    pub auto_renew_certificates: bool,
    pub copy_kubeconfig: bool,
}

impl_to_value!(Other {
    auto_renew_certificates => { yaml = "autoRenewCertificates" },
    copy_kubeconfig => { yaml = "copyKubeconfig" },
});

/// Optional cluster add-ons
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Addons {
    /// Raw kubespray add-on configuration, passed through and never compared
    pub kubespray: Option<serde_yaml::Value>,
    pub rook: Option<Rook>,
}

// Free-form kubespray overrides never take part in the diff.
impl_to_value!(Addons {
    kubespray => { yaml = "kubespray", opt = "-" },
    rook => { yaml = "rook" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rook {
    pub enabled: Option<bool>,
    pub node_selector: Labels,
    pub version: Option<String>,
}

impl_to_value!(Rook {
    enabled => { yaml = "enabled" },
    node_selector => { yaml = "nodeSelector" },
    version => { yaml = "version" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kubitect {
    pub url: Option<String>,
    pub version: Option<String>,
}

impl_to_value!(Kubitect {
    url => { yaml = "url" },
    version => { yaml = "version" },
});
