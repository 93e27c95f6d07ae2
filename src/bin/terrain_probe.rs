use grimoire::net::query::InfoClient;

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 || args.len() % 2 != 0 {
        return Err("usage: terrain_probe <host:port> <x> <y> [<x> <y> ...]".to_string());
    }
    let mut client = InfoClient::new(args[1].clone());

    println!("terrain probe: {}", args[1]);
    for pair in args[2..].chunks(2) {
        let x = pair[0]
            .parse::<i32>()
            .map_err(|_| format!("bad x coordinate '{}'", pair[0]))?;
        let y = pair[1]
            .parse::<i32>()
            .map_err(|_| format!("bad y coordinate '{}'", pair[1]))?;
        match client.terrain(x, y) {
            Ok(terrain) => println!("- ({}, {}): {}", x, y, terrain),
            Err(err) => println!("- ({}, {}): error: {}", x, y, err),
        }
    }
    Ok(())
}
