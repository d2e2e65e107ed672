fn main() -> anyhow::Result<()> {
    poseperfect_lib::run()
}
