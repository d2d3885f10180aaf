use super::*;

fn address(type_: &str, address: &str) -> corev1::NodeAddress {
    corev1::NodeAddress {
        address: address.to_string(),
        type_: type_.to_string(),
    }
}

fn annotations<const N: usize>(pairs: [(&str, &str); N]) -> Annotations {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn converged(ip: &str) -> Annotations {
    annotations([
        (FLANNEL_PUBLIC_IP_ANNOTATION, ip),
        (FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION, ip),
    ])
}

#[test]
fn external_address_without_annotations() {
    let addresses = [address(NODE_EXTERNAL_IP, "203.0.113.5")];
    let mut annotations = Annotations::new();

    let resolution = resolve(&addresses, &annotations).unwrap();
    assert_eq!(resolution.public_ip, "203.0.113.5");
    assert!(resolution.needs_update);

    resolution.apply(&mut annotations);
    assert_eq!(annotations, converged("203.0.113.5"));
}

#[test]
fn falls_back_to_rke_annotation() {
    let annotations = annotations([(RKE_EXTERNAL_IP_ANNOTATION, "198.51.100.9")]);
    let resolution = resolve(&[], &annotations).unwrap();
    assert_eq!(resolution.public_ip, "198.51.100.9");
    assert!(resolution.needs_update);
}

#[test]
fn nothing_to_resolve() {
    assert_eq!(resolve(&[], &Annotations::new()), None);

    let addresses = [
        address("InternalIP", "10.0.0.4"),
        address("Hostname", "worker-1"),
    ];
    let annotations = annotations([("unrelated", "198.51.100.9")]);
    assert_eq!(resolve(&addresses, &annotations), None);
}

#[test]
fn converged_node_needs_no_update() {
    let addresses = [address(NODE_EXTERNAL_IP, "203.0.113.5")];
    let resolution = resolve(&addresses, &converged("203.0.113.5")).unwrap();
    assert_eq!(
        resolution,
        Resolution {
            public_ip: "203.0.113.5".to_string(),
            needs_update: false,
        }
    );
}

#[test]
fn first_external_address_wins() {
    let addresses = [
        address("InternalIP", "10.0.0.4"),
        address(NODE_EXTERNAL_IP, "203.0.113.5"),
        address("Hostname", "worker-1"),
        address(NODE_EXTERNAL_IP, "203.0.113.77"),
    ];
    let resolution = resolve(&addresses, &Annotations::new()).unwrap();
    assert_eq!(resolution.public_ip, "203.0.113.5");
}

#[test]
fn external_address_beats_rke_annotation() {
    let addresses = [address(NODE_EXTERNAL_IP, "203.0.113.5")];
    let annotations = annotations([(RKE_EXTERNAL_IP_ANNOTATION, "198.51.100.9")]);
    let resolution = resolve(&addresses, &annotations).unwrap();
    assert_eq!(resolution.public_ip, "203.0.113.5");
}

#[test]
fn empty_external_address_falls_back_to_annotation() {
    let addresses = [
        address(NODE_EXTERNAL_IP, ""),
        address(NODE_EXTERNAL_IP, "203.0.113.77"),
    ];
    let annotations = annotations([(RKE_EXTERNAL_IP_ANNOTATION, "198.51.100.9")]);
    let resolution = resolve(&addresses, &annotations).unwrap();
    assert_eq!(resolution.public_ip, "198.51.100.9");
}

#[test]
fn empty_rke_annotation_is_still_used() {
    let mut annotations = annotations([
        (RKE_EXTERNAL_IP_ANNOTATION, ""),
        (FLANNEL_PUBLIC_IP_ANNOTATION, "203.0.113.5"),
        (FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION, "203.0.113.5"),
    ]);
    let resolution = resolve(&[], &annotations).unwrap();
    assert_eq!(
        resolution,
        Resolution {
            public_ip: String::new(),
            needs_update: true,
        }
    );

    resolution.apply(&mut annotations);
    assert!(!resolve(&[], &annotations).unwrap().needs_update);
}

#[test]
fn one_stale_annotation_needs_update() {
    let addresses = [address(NODE_EXTERNAL_IP, "203.0.113.5")];

    let stale_override = annotations([
        (FLANNEL_PUBLIC_IP_ANNOTATION, "203.0.113.5"),
        (FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION, "203.0.113.4"),
    ]);
    assert!(resolve(&addresses, &stale_override).unwrap().needs_update);

    let missing_public_ip = annotations([(FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION, "203.0.113.5")]);
    assert!(resolve(&addresses, &missing_public_ip).unwrap().needs_update);
}

#[test]
fn comparison_is_exact() {
    let addresses = [address(NODE_EXTERNAL_IP, "2001:DB8::1")];
    let resolution = resolve(&addresses, &converged("2001:db8::1")).unwrap();
    assert!(resolution.needs_update);

    let padded = converged(" 2001:DB8::1");
    assert!(resolve(&addresses, &padded).unwrap().needs_update);
}

#[test]
fn apply_is_idempotent() {
    let addresses = [address("InternalIP", "10.0.0.4")];
    let mut annotations = annotations([
        (RKE_EXTERNAL_IP_ANNOTATION, "198.51.100.9"),
        (FLANNEL_PUBLIC_IP_ANNOTATION, "10.0.0.4"),
        ("kubeadm.alpha.kubernetes.io/cri-socket", "/run/containerd.sock"),
    ]);

    let resolution = resolve(&addresses, &annotations).unwrap();
    assert!(resolution.needs_update);
    resolution.apply(&mut annotations);

    let again = resolve(&addresses, &annotations).unwrap();
    assert_eq!(again.public_ip, resolution.public_ip);
    assert!(!again.needs_update);
    assert_eq!(annotations.len(), 4);
    assert_eq!(
        annotations[RKE_EXTERNAL_IP_ANNOTATION], "198.51.100.9",
        "input annotations are never removed"
    );
}
