use std::time::Duration;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn success_body(value_xml: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse>\n<params>\n<param>\n<value>{value_xml}</value>\n</param>\n</params>\n</methodResponse>\n"
    )
}

pub fn fault_body(code: i64, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>{code}</int></value></member>\
         <member><name>faultString</name><value><string>{message}</string></value></member>\
         </struct></value></fault></methodResponse>"
    )
}

pub fn record_xml(members: &[(&str, &str)]) -> String {
    let members: String = members
        .iter()
        .map(|(name, value)| format!("<member><name>{name}</name><value>{value}</value></member>"))
        .collect();
    format!("<value><struct>{members}</struct></value>")
}

pub fn list_xml(records: &[String]) -> String {
    format!("<array><data>{}</data></array>", records.concat())
}
