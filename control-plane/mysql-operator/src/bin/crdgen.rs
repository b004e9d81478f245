use kube::core::CustomResourceExt;
use mysql_operator::crd::MySQL;

fn main() -> anyhow::Result<()> {
    let crd = MySQL::crd();
    println!("{}", serde_yaml::to_string(&crd)?);
    Ok(())
}
