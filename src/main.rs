fn main() -> anyhow::Result<()> {
    art_gallery::run()
}
