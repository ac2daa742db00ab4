use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// Written as text by serializers; see their string converters.
crate::reflect_opaque!(#[module_path = "core::net"] IpAddr);
crate::reflect_opaque!(#[module_path = "core::net"] Ipv4Addr);
crate::reflect_opaque!(#[module_path = "core::net"] Ipv6Addr);
crate::reflect_opaque!(#[module_path = "core::net"] SocketAddr);

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use crate::info::{TypePath, Typed};

    #[test]
    fn net_types_are_opaque() {
        assert_eq!(IpAddr::type_path(), "core::net::IpAddr");
        assert!(IpAddr::type_info().is_serializable());
        assert_eq!(IpAddr::type_info().crate_name(), "core");
    }
}
